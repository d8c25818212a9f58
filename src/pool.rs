//! # Match Pool
//!
//! The fixed set of match slots players race through. Built once from the
//! configured game count, it never grows or shrinks; between rounds it is
//! reset in place.

use crate::match_state::{Lifecycle, MatchSnapshot, MatchState, PlayerId, SeatClaim};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fixed-size collection of match slots.
#[derive(Debug)]
pub struct MatchPool {
    matches: Vec<MatchState>,
    aborted: AtomicBool,
}

impl MatchPool {
    /// Creates `games` empty slots numbered from 1.
    pub fn new(games: usize) -> Self {
        Self {
            matches: (1..=games).map(MatchState::new).collect(),
            aborted: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Slot at 0-based `index`.
    pub fn get(&self, index: usize) -> Option<&MatchState> {
        self.matches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchState> {
        self.matches.iter()
    }

    /// Tries to seat `player` in the slot at `index`.
    ///
    /// `Full` for a full slot, an index past the end, or an aborted round.
    /// Safe to call from any number of threads at once; each slot accepts
    /// at most two claims per round.
    pub fn try_claim_seat(&self, index: usize, player: PlayerId) -> SeatClaim {
        if self.is_aborted() {
            return SeatClaim::Full;
        }
        match self.matches.get(index) {
            Some(state) => state.try_claim_seat(player),
            None => SeatClaim::Full,
        }
    }

    /// Tears the round down after an invariant violation.
    ///
    /// Later claims fail, every unfinished slot becomes `Aborted`, and all
    /// participants blocked in those matches are woken. Returns how many
    /// claimed matches were torn down; only the first call does anything.
    pub fn abort(&self) -> usize {
        if self.aborted.swap(true, Ordering::AcqRel) {
            return 0;
        }
        let mut torn_down = 0;
        for state in &self.matches {
            let claimed = state.occupancy() > 0;
            if state.abort() && claimed {
                torn_down += 1;
            }
        }
        warn!("round aborted: {} live match(es) torn down", torn_down);
        torn_down
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// True when no slot has been claimed or played since the last reset.
    pub fn is_fresh(&self) -> bool {
        !self.is_aborted()
            && self
                .matches
                .iter()
                .all(|m| m.occupancy() == 0 && m.lifecycle() == Lifecycle::AwaitingPlayers)
    }

    /// Snapshots of every slot, in pool order.
    pub fn snapshots(&self) -> Vec<MatchSnapshot> {
        self.matches.iter().map(MatchState::snapshot).collect()
    }

    /// Returns every slot to `AwaitingPlayers` and clears the abort flag.
    pub fn reset(&mut self) {
        for state in self.matches.iter_mut() {
            state.reset();
        }
        *self.aborted.get_mut() = false;
    }
}
