//! Whole rounds through the public `Arena` API.

use arena::{Arena, ArenaConfig, ArenaError, InvariantViolation, Lifecycle};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn seeded_arena(players: i64, games: i64, seed: u64) -> Arena {
    Arena::new(ArenaConfig::new(players, games).unwrap().with_seed(seed))
}

#[test]
fn test_two_players_one_game() {
    let mut arena = seeded_arena(2, 1, 1);
    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();

    let totals = report.totals();
    assert_eq!(totals.games_started, 1);
    assert_eq!(totals.played, 2);
    assert_eq!(totals.games_won + totals.games_drawn, 1);
    for record in &report.players {
        assert_eq!(record.stats.played, 1);
    }
    let snap = &report.matches[0];
    assert_eq!(snap.occupancy, 2);
    assert_ne!(snap.first, snap.second);
}

#[test]
fn test_three_players_one_game_leaves_one_idle() {
    let mut arena = seeded_arena(3, 1, 2);
    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();

    let mut played: Vec<_> = report.players.iter().map(|r| r.stats.played).collect();
    played.sort_unstable();
    assert_eq!(played, vec![0, 1, 1]);
}

#[test]
fn test_four_players_two_games_all_played() {
    let mut arena = seeded_arena(4, 2, 3);
    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();

    assert!(report
        .matches
        .iter()
        .all(|m| matches!(m.lifecycle, Lifecycle::Won(_) | Lifecycle::Draw)));
    assert_eq!(report.totals().played, 4);
}

#[test]
fn test_zero_games() {
    let mut arena = seeded_arena(5, 0, 4);
    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();
    assert!(report.matches.is_empty());
    assert!(report.players.iter().all(|r| r.stats.played == 0));
    assert!(report
        .to_string()
        .ends_with("Total Games = 0, 0 Games Won, 0 Games were a Draw, 0 Games not played"));
}

#[test]
fn test_many_players_many_rounds() {
    let mut arena = seeded_arena(24, 6, 5);
    for round in 1..=10 {
        let report = arena.run_round().unwrap();
        assert_eq!(report.round, round);
        report.check_consistency().unwrap();
        // Every slot is visited by every player, so every slot fills.
        assert_eq!(report.totals().games_started, 6);
        assert_eq!(report.totals().played, 12);
        arena.reset().unwrap();
    }
    assert_eq!(arena.rounds_played(), 10);
}

#[test]
fn test_reset_clears_tallies_and_slots() {
    let mut arena = seeded_arena(2, 3, 6);
    arena.run_round().unwrap();
    arena.reset().unwrap();
    assert!(arena.players().iter().all(|p| p.stats().played == 0));
    assert!(arena
        .pool()
        .snapshots()
        .iter()
        .all(|s| s.lifecycle == Lifecycle::AwaitingPlayers && s.occupancy == 0 && s.moves == 0));

    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();
    assert_eq!(report.totals().games_started, 3);
}

#[test]
fn test_unseeded_arena_runs() {
    let mut arena = Arena::new(ArenaConfig::new(3, 2).unwrap());
    let report = arena.run_round().unwrap();
    report.check_consistency().unwrap();
    assert_eq!(report.totals().games_started, 2);
}

#[test]
fn test_second_round_without_reset_is_refused() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut arena = seeded_arena(4, 2, 3);
        let first = arena.run_round().map(|r| r.totals());
        let second = arena.run_round().map(|r| r.totals());
        let rounds = arena.rounds_played();
        arena.reset().unwrap();
        let third = arena.run_round().map(|r| r.round);
        let _ = tx.send((first.is_ok(), second, rounds, third.ok()));
    });

    let (first_ok, second, rounds, third) = rx
        .recv_timeout(Duration::from_secs(20))
        .expect("second run_round without reset must not block");
    assert!(first_ok);
    assert!(matches!(
        second,
        Err(ArenaError::Invariant(InvariantViolation::RoundNotReset { next: 2 }))
    ));
    assert_eq!(rounds, 1);
    assert_eq!(third, Some(2));
}
