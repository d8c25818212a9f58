//! # Players
//!
//! A player is owned by exactly one worker thread for a whole round. Its
//! statistics are only read back by the orchestrator after the thread has
//! been joined.

use crate::barrier::RoundBarrier;
use crate::error::InvariantViolation;
use crate::match_state::{PlayerId, Seat, SeatClaim};
use crate::pool::MatchPool;
use crate::random::RandomMoveSelector;
use crate::turn::{self, MatchOutcome};
use log::{error, info};
use std::thread;

/// Per-round tallies for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub played: usize,
    pub won: usize,
    pub lost: usize,
    pub drawn: usize,
}

impl PlayerStats {
    pub fn record(&mut self, outcome: MatchOutcome) {
        self.played += 1;
        match outcome {
            MatchOutcome::Won => self.won += 1,
            MatchOutcome::Lost => self.lost += 1,
            MatchOutcome::Drawn => self.drawn += 1,
        }
    }
}

/// One autonomous player.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    stats: PlayerStats,
    role: Option<Seat>,
    selector: RandomMoveSelector,
}

/// Keeps a player counted in the barrier for as long as its worker runs.
///
/// Deregisters on drop, including during a panic; a panicking worker also
/// tears the round down so its opponent does not wait forever.
struct Enrollment<'a> {
    player: PlayerId,
    barrier: &'a RoundBarrier,
    pool: &'a MatchPool,
}

impl<'a> Enrollment<'a> {
    fn new(
        player: PlayerId,
        barrier: &'a RoundBarrier,
        pool: &'a MatchPool,
    ) -> Result<Self, InvariantViolation> {
        barrier.register()?;
        Ok(Self {
            player,
            barrier,
            pool,
        })
    }
}

impl Drop for Enrollment<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("Player {} panicked", self.player);
            self.pool.abort();
        }
        if let Err(violation) = self.barrier.deregister() {
            error!("Player {}: {}", self.player, violation);
        }
    }
}

impl Player {
    pub fn new(id: PlayerId, selector: RandomMoveSelector) -> Self {
        Self {
            id,
            stats: PlayerStats::default(),
            role: None,
            selector,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Seat held in the match currently being played, if any.
    pub fn role(&self) -> Option<Seat> {
        self.role
    }

    pub fn reset_stats(&mut self) {
        self.stats = PlayerStats::default();
        self.role = None;
    }

    /// Worker body for one round: register, wait for the starting gun,
    /// visit every slot, deregister.
    ///
    /// A refused registration returns at once without touching the pool.
    /// Any later violation aborts the pool before returning, so every other
    /// worker drains out and the completion gate still opens.
    pub fn run(&mut self, pool: &MatchPool, barrier: &RoundBarrier) -> Result<(), InvariantViolation> {
        info!("Player {} waiting on starting gun", self.id);
        let _enrollment = Enrollment::new(self.id, barrier, pool)?;
        barrier.await_start()?;

        info!("Player {} running", self.id);
        let result = self.tour(pool);
        if result.is_err() {
            pool.abort();
        }
        result
    }

    /// Walks the pool once in slot order, playing every match it gets a
    /// seat in. Full slots are skipped; ending with no matches is normal.
    pub fn tour(&mut self, pool: &MatchPool) -> Result<(), InvariantViolation> {
        info!("Player {} starting to play games...", self.id);
        for index in 0..pool.len() {
            let seat = match pool.try_claim_seat(index, self.id) {
                SeatClaim::Seated(seat) => seat,
                SeatClaim::Full => continue,
            };
            let Some(state) = pool.get(index) else {
                continue;
            };
            info!("Player {} joining game {} as {}", self.id, state.number(), seat);
            self.role = Some(seat);
            let outcome = turn::play(state, seat, self.id, &mut self.selector);
            self.role = None;
            self.stats.record(outcome?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record() {
        let mut stats = PlayerStats::default();
        stats.record(MatchOutcome::Won);
        stats.record(MatchOutcome::Drawn);
        stats.record(MatchOutcome::Lost);
        stats.record(MatchOutcome::Won);
        assert_eq!(
            stats,
            PlayerStats {
                played: 4,
                won: 2,
                lost: 1,
                drawn: 1
            }
        );
    }

    #[test]
    fn test_tour_of_full_pool_plays_nothing() {
        let pool = MatchPool::new(2);
        for index in 0..2 {
            pool.try_claim_seat(index, 10);
            pool.try_claim_seat(index, 11);
        }
        // Both slots are taken by players that never show up to play, but
        // a latecomer only ever sees `Full`.
        let mut player = Player::new(0, RandomMoveSelector::seeded(3, 0));
        assert_eq!(player.tour(&pool), Ok(()));
        assert_eq!(player.stats(), PlayerStats::default());
        assert_eq!(player.role(), None);
    }

    #[test]
    fn test_run_after_gun_is_refused() {
        let pool = MatchPool::new(1);
        let barrier = RoundBarrier::new();
        barrier.open_start(0).unwrap();
        let mut player = Player::new(0, RandomMoveSelector::seeded(3, 0));
        assert_eq!(
            player.run(&pool, &barrier),
            Err(InvariantViolation::LateRegistration)
        );
        assert_eq!(barrier.active(), 0);
        assert_eq!(pool.get(0).unwrap().occupancy(), 0);
    }

    #[test]
    fn test_run_on_aborted_gate_leaves_barrier_empty() {
        let pool = MatchPool::new(1);
        let barrier = RoundBarrier::new();
        barrier.abort();
        let mut player = Player::new(0, RandomMoveSelector::seeded(3, 0));
        assert_eq!(
            player.run(&pool, &barrier),
            Err(InvariantViolation::RoundAborted)
        );
        assert_eq!(barrier.active(), 0);
        assert_eq!(player.stats().played, 0);
    }
}
