use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CollegeId, GameId};

/// Per-game tournament counts. Always holds an entry for every known game,
/// zero when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentCountMap(BTreeMap<GameId, u64>);

impl TournamentCountMap {
    pub fn zeroed<'a>(games: impl IntoIterator<Item = &'a GameId>) -> Self {
        Self(games.into_iter().map(|game| (game.clone(), 0)).collect())
    }

    pub fn get(&self, game: &GameId) -> u64 {
        self.0.get(game).copied().unwrap_or_default()
    }

    pub fn increment(&mut self, game: &GameId) {
        *self.0.entry(game.clone()).or_default() += 1;
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameId, u64)> {
        self.0.iter().map(|(game, count)| (game, *count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentCountsSnapshot {
    pub counts: TournamentCountMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// The accumulated wizard selections handed to the registration screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSelection {
    pub college: CollegeId,
    pub game: GameId,
    pub handoff_route: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_map_lists_every_game() {
        let games = [GameId::new("bgmi"), GameId::new("cod")];
        let mut counts = TournamentCountMap::zeroed(&games);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 0);

        counts.increment(&games[1]);
        counts.increment(&games[1]);
        assert_eq!(counts.get(&games[1]), 2);
        assert_eq!(counts.get(&GameId::new("valorant")), 0);
    }

    #[test]
    fn serializes_as_plain_object() {
        let counts = TournamentCountMap::zeroed(&[GameId::new("valorant")]);
        assert_eq!(
            serde_json::to_value(&counts).expect("json"),
            serde_json::json!({ "valorant": 0 })
        );
    }

    #[test]
    fn ids_pad_when_formatted_with_width() {
        assert_eq!(format!("{:<6}|", GameId::new("cod")), "cod   |");
    }
}
