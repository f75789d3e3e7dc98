use super::*;

fn records(games: &[&str]) -> Vec<TournamentRecord> {
    games.iter().map(|game| TournamentRecord::with_game(*game)).collect()
}

#[test]
fn classifies_synonyms_case_insensitively() {
    let table = GameRuleTable::standard();
    let cases = [
        ("Battlegrounds Mobile India Finals", "bgmi"),
        ("BGMI Campus Clash", "bgmi"),
        ("Call of Duty Mobile Invitational", "cod"),
        ("CODM weekly", "cod"),
        ("VALORANT Premier", "valorant"),
        ("Free Fire MAX", "freefire"),
        ("freefire scrims", "freefire"),
    ];
    for (text, expected) in cases {
        assert_eq!(
            table.classify(text).map(GameId::as_str),
            Some(expected),
            "classifying {text:?}"
        );
    }
}

#[test]
fn unknown_game_is_not_classified() {
    assert_eq!(GameRuleTable::standard().classify("Unknown Game XYZ"), None);
}

#[test]
fn first_matching_rule_wins() {
    // Matches both the bgmi and valorant fragments.
    let table = GameRuleTable::standard();
    assert_eq!(
        table.classify("battlegrounds vs valorant showmatch").map(GameId::as_str),
        Some("bgmi")
    );

    let reordered = GameRuleTable::new(vec![
        GameRule::new(GameId::new("valorant"), ["valorant"]),
        GameRule::new(GameId::new("bgmi"), ["battlegrounds"]),
    ]);
    assert_eq!(
        reordered
            .classify("battlegrounds vs valorant showmatch")
            .map(GameId::as_str),
        Some("valorant")
    );
}

#[test]
fn fragments_are_lowercased_on_construction() {
    let rule = GameRule::new(GameId::new("rl"), ["Rocket League"]);
    assert_eq!(rule.fragments(), ["rocket league".to_string()]);
    let table = GameRuleTable::new(vec![rule]);
    assert_eq!(
        table.classify("ROCKET LEAGUE cup").map(GameId::as_str),
        Some("rl")
    );
}

#[test]
fn tally_of_nothing_is_zero_for_every_game() {
    let counts = GameRuleTable::standard().tally(&Vec::new());
    assert_eq!(counts.len(), 4);
    for game in ["bgmi", "cod", "valorant", "freefire"] {
        assert_eq!(counts.get(&GameId::new(game)), 0);
    }
}

#[test]
fn tally_counts_first_match_and_skips_the_rest() {
    let mut input = records(&[
        "BGMI Finals",
        "Battlegrounds Mobile India Finals",
        "Valorant Campus Cup",
        "Call of Duty",
        "Unknown Game XYZ",
        "Chess",
    ]);
    input.push(TournamentRecord::default());

    let counts = GameRuleTable::standard().tally(&input);
    assert_eq!(counts.get(&GameId::new("bgmi")), 2);
    assert_eq!(counts.get(&GameId::new("valorant")), 1);
    assert_eq!(counts.get(&GameId::new("cod")), 1);
    assert_eq!(counts.get(&GameId::new("freefire")), 0);
    assert_eq!(counts.total(), 4);
}

#[test]
fn duplicate_rule_targets_are_listed_once() {
    let table = GameRuleTable::new(vec![
        GameRule::new(GameId::new("cod"), ["call of duty"]),
        GameRule::new(GameId::new("bgmi"), ["bgmi"]),
        GameRule::new(GameId::new("cod"), ["cod"]),
    ]);
    let ids: Vec<_> = table.game_ids().map(GameId::as_str).collect();
    assert_eq!(ids, vec!["cod", "bgmi"]);
}
