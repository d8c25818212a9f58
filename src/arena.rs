//! # Arena Orchestrator
//!
//! Owns the players, the match pool and the round barrier, and drives one
//! round at a time:
//! 1. spawn one scoped thread per player;
//! 2. wait until all of them registered, then fire the starting gun;
//! 3. wait on the completion gate and join every thread;
//! 4. aggregate the results.
//!
//! Player threads borrow the pool and the barrier, and each borrows its own
//! `Player` mutably. Those borrows end when the thread scope closes, which is
//! what lets [`Arena::reset`] take the pool by `&mut`.

use crate::barrier::RoundBarrier;
use crate::config::ArenaConfig;
use crate::error::{ArenaError, InvariantViolation};
use crate::player::Player;
use crate::pool::MatchPool;
use crate::random::RandomMoveSelector;
use crate::results::RoundReport;
use log::{error, info};
use std::thread;

/// A configured set of players and match slots.
#[derive(Debug)]
pub struct Arena {
    config: ArenaConfig,
    pool: MatchPool,
    barrier: RoundBarrier,
    players: Vec<Player>,
    rounds_played: usize,
}

impl Arena {
    /// Builds the pool and the players. Each player's selector is seeded
    /// from the configured base seed, or from OS entropy without one.
    pub fn new(config: ArenaConfig) -> Self {
        let players = (0..config.players)
            .map(|id| {
                let selector = match config.seed {
                    Some(seed) => RandomMoveSelector::seeded(seed, id),
                    None => RandomMoveSelector::from_entropy(),
                };
                Player::new(id, selector)
            })
            .collect();
        Self {
            pool: MatchPool::new(config.games),
            barrier: RoundBarrier::new(),
            players,
            config,
            rounds_played: 0,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn pool(&self) -> &MatchPool {
        &self.pool
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    /// Plays one full round and returns its report.
    ///
    /// # Errors
    /// The first invariant violation raised by any worker (consequential
    /// aborts are only returned if nothing else was), a worker panic, or a
    /// failed thread spawn. The round still counts as played and the arena
    /// can be [`reset`](Arena::reset) afterwards.
    ///
    /// `RoundNotReset` without spawning anything if a previous round has not
    /// been followed by [`reset`](Arena::reset).
    pub fn run_round(&mut self) -> Result<RoundReport, ArenaError> {
        let expected = self.players.len();
        let round = self.rounds_played + 1;
        if !self.barrier.is_ready() || !self.pool.is_fresh() {
            return Err(InvariantViolation::RoundNotReset { next: round }.into());
        }
        info!(
            "Round {}: starting {} player(s) for {} game(s)",
            round,
            expected,
            self.pool.len()
        );

        let Arena {
            pool,
            barrier,
            players,
            ..
        } = self;
        let (pool, barrier) = (&*pool, &*barrier);

        let errors: Vec<ArenaError> = thread::scope(|s| {
            let mut errors = Vec::new();
            let mut handles = Vec::with_capacity(expected);
            for player in players.iter_mut() {
                let id = player.id();
                let spawned = thread::Builder::new()
                    .name(format!("player-{}", id))
                    .spawn_scoped(s, move || player.run(pool, barrier));
                match spawned {
                    Ok(handle) => handles.push((id, handle)),
                    Err(source) => {
                        errors.push(ArenaError::Spawn { player: id, source });
                        break;
                    }
                }
            }

            if handles.len() == expected {
                barrier.await_registration(expected);
                match barrier.open_start(expected) {
                    Ok(()) => info!("Round {}: starting gun fired", round),
                    Err(violation) => {
                        error!("Round {}: {}", round, violation);
                        errors.push(violation.into());
                        barrier.abort();
                    }
                }
            } else {
                barrier.abort();
            }

            barrier.await_completion();
            for (id, handle) in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(violation)) => errors.push(violation.into()),
                    Err(_) => errors.push(ArenaError::WorkerPanicked { player: id }),
                }
            }
            errors
        });

        self.rounds_played = round;
        if let Some(err) = root_cause(errors) {
            error!("Round {} failed: {}", round, err);
            return Err(err);
        }

        let report = RoundReport::new(round, &self.players, self.pool.snapshots());
        let totals = report.totals();
        info!(
            "Round {}: {} match(es) played, {} won, {} drawn",
            round, totals.games_started, totals.games_won, totals.games_drawn
        );
        Ok(report)
    }

    /// Prepares every slot, the barrier and all player tallies for another
    /// round.
    ///
    /// # Errors
    /// `ResetWhileActive` if a player is still registered in the barrier.
    pub fn reset(&mut self) -> Result<(), InvariantViolation> {
        self.barrier.reset_for_next_round()?;
        self.pool.reset();
        for player in self.players.iter_mut() {
            player.reset_stats();
        }
        Ok(())
    }
}

/// Picks the error that caused a failed round.
///
/// Aborts raised because some other thread tore the round down are
/// consequences, so anything else reported alongside them wins.
fn root_cause(errors: Vec<ArenaError>) -> Option<ArenaError> {
    let is_consequence = |err: &ArenaError| {
        matches!(
            err,
            ArenaError::Invariant(InvariantViolation::MatchAborted { .. })
                | ArenaError::Invariant(InvariantViolation::RoundAborted)
        )
    };
    let mut fallback = None;
    for err in errors {
        if !is_consequence(&err) {
            return Some(err);
        }
        fallback.get_or_insert(err);
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_prefers_original_violation() {
        let errors = vec![
            InvariantViolation::MatchAborted { game: 2 }.into(),
            InvariantViolation::OutOfTurn {
                game: 1,
                seat: crate::match_state::Seat::Second,
                expected: crate::match_state::Seat::First,
            }
            .into(),
        ];
        assert!(matches!(
            root_cause(errors),
            Some(ArenaError::Invariant(InvariantViolation::OutOfTurn { game: 1, .. }))
        ));
    }

    #[test]
    fn test_root_cause_falls_back_to_first_abort() {
        let errors = vec![
            InvariantViolation::MatchAborted { game: 3 }.into(),
            InvariantViolation::RoundAborted.into(),
        ];
        assert!(matches!(
            root_cause(errors),
            Some(ArenaError::Invariant(InvariantViolation::MatchAborted { game: 3 }))
        ));
        assert!(root_cause(Vec::new()).is_none());
    }

    #[test]
    fn test_claimed_pool_blocks_next_round() {
        let mut arena = Arena::new(ArenaConfig::new(2, 1).unwrap().with_seed(4));
        arena.pool.try_claim_seat(0, 0);
        assert!(matches!(
            arena.run_round(),
            Err(ArenaError::Invariant(InvariantViolation::RoundNotReset { next: 1 }))
        ));
        assert_eq!(arena.rounds_played(), 0);
        arena.reset().unwrap();
        arena.run_round().unwrap().check_consistency().unwrap();
    }

    #[test]
    fn test_new_arena_layout() {
        let arena = Arena::new(ArenaConfig::new(3, 2).unwrap().with_seed(11));
        assert_eq!(arena.players().len(), 3);
        assert_eq!(arena.pool().len(), 2);
        assert_eq!(arena.rounds_played(), 0);
        let ids: Vec<_> = arena.players().iter().map(Player::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
