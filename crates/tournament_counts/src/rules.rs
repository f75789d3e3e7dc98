use shared::{domain::GameId, protocol::TournamentCountMap};

use crate::source::TournamentRecord;

/// Priority order matters: the first rule with a matching fragment wins.
const STANDARD_RULES: &[(&str, &[&str])] = &[
    ("bgmi", &["bgmi", "battlegrounds"]),
    ("cod", &["cod", "call of duty"]),
    ("valorant", &["valorant"]),
    ("freefire", &["free fire", "freefire"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRule {
    pub game: GameId,
    fragments: Vec<String>,
}

impl GameRule {
    pub fn new<I, S>(game: GameId, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            game,
            fragments: fragments
                .into_iter()
                .map(|fragment| fragment.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    fn matches(&self, lowered: &str) -> bool {
        self.fragments
            .iter()
            .any(|fragment| lowered.contains(fragment.as_str()))
    }
}

/// Ordered substring rules mapping free-text game names onto known ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRuleTable {
    rules: Vec<GameRule>,
}

impl GameRuleTable {
    pub fn new(rules: Vec<GameRule>) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(
            STANDARD_RULES
                .iter()
                .map(|(game, fragments)| GameRule::new(GameId::new(*game), fragments.iter()))
                .collect(),
        )
    }

    pub fn rules(&self) -> &[GameRule] {
        &self.rules
    }

    /// Every id the table can produce, in priority order. A game listed by
    /// two rules appears once.
    pub fn game_ids(&self) -> impl Iterator<Item = &GameId> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(index, rule)| {
                !self.rules[..*index]
                    .iter()
                    .any(|earlier| earlier.game == rule.game)
            })
            .map(|(_, rule)| &rule.game)
    }

    pub fn classify(&self, game_text: &str) -> Option<&GameId> {
        let lowered = game_text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| &rule.game)
    }

    /// Counts records per game. Records without a game, or whose game
    /// matches no rule, are skipped.
    pub fn tally<'a, I>(&self, records: I) -> TournamentCountMap
    where
        I: IntoIterator<Item = &'a TournamentRecord>,
    {
        let mut counts = TournamentCountMap::zeroed(self.game_ids());
        for record in records {
            if let Some(game) = record.game.as_deref().and_then(|text| self.classify(text)) {
                counts.increment(game);
            }
        }
        counts
    }
}

impl Default for GameRuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod tests;
