//! # Round Barrier
//!
//! Two gates around a round of play, for a player count the barrier does not
//! know up front:
//! - the start gate ("starting gun") holds every registered player until the
//!   orchestrator has seen all of them register;
//! - the completion gate holds the orchestrator until every player has
//!   deregistered.
//!
//! All state sits behind one lock and is only reachable through the methods
//! below. Every wait is a predicate wait, so a gate opened before a thread
//! starts waiting is never missed.

use crate::error::InvariantViolation;
use log::{debug, warn};
use parking_lot::{Condvar, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    Closed,
    Open,
    Aborted,
}

#[derive(Debug)]
struct Roster {
    active: usize,
    gate: Gate,
}

/// Process-wide start/completion barrier for player threads.
#[derive(Debug)]
pub struct RoundBarrier {
    roster: Mutex<Roster>,
    /// Players wait here for the gate to leave `Closed`
    gun: Condvar,
    /// The orchestrator waits here for the active count to change
    roster_changed: Condvar,
}

impl Default for RoundBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundBarrier {
    pub fn new() -> Self {
        Self {
            roster: Mutex::new(Roster {
                active: 0,
                gate: Gate::Closed,
            }),
            gun: Condvar::new(),
            roster_changed: Condvar::new(),
        }
    }

    /// Counts the calling thread as active for this round.
    ///
    /// # Errors
    /// Refused once the gate has left `Closed`: `RoundAborted` after
    /// [`RoundBarrier::abort`], `LateRegistration` after the starting gun.
    /// A refused thread is not counted.
    pub fn register(&self) -> Result<(), InvariantViolation> {
        let mut roster = self.roster.lock();
        match roster.gate {
            Gate::Closed => {}
            Gate::Aborted => return Err(InvariantViolation::RoundAborted),
            Gate::Open => {
                warn!("player registered after the start gate was released");
                return Err(InvariantViolation::LateRegistration);
            }
        }
        roster.active += 1;
        drop(roster);
        self.roster_changed.notify_all();
        Ok(())
    }

    /// Blocks until the starting gun fires.
    ///
    /// # Errors
    /// `RoundAborted` if the gate was released by [`RoundBarrier::abort`].
    pub fn await_start(&self) -> Result<(), InvariantViolation> {
        let mut roster = self.roster.lock();
        self.gun.wait_while(&mut roster, |r| r.gate == Gate::Closed);
        match roster.gate {
            Gate::Aborted => Err(InvariantViolation::RoundAborted),
            Gate::Open | Gate::Closed => Ok(()),
        }
    }

    /// Blocks the orchestrator until at least `expected` threads registered.
    pub fn await_registration(&self, expected: usize) {
        let mut roster = self.roster.lock();
        self.roster_changed
            .wait_while(&mut roster, |r| r.active < expected);
    }

    /// Fires the starting gun, releasing every thread in `await_start`.
    ///
    /// # Errors
    /// `StartBeforeRegistration` if the active count is not `expected`; the
    /// gate stays closed.
    pub fn open_start(&self, expected: usize) -> Result<(), InvariantViolation> {
        let mut roster = self.roster.lock();
        if roster.active != expected {
            return Err(InvariantViolation::StartBeforeRegistration {
                registered: roster.active,
                expected,
            });
        }
        roster.gate = Gate::Open;
        drop(roster);
        self.gun.notify_all();
        debug!("starting gun fired for {} player(s)", expected);
        Ok(())
    }

    /// Releases the start gate without starting the round. Waiting players
    /// get `RoundAborted` and leave.
    pub fn abort(&self) {
        self.roster.lock().gate = Gate::Aborted;
        self.gun.notify_all();
    }

    /// Counts the calling thread out of the round.
    ///
    /// # Errors
    /// `DeregisterWithoutRegister` if nobody is active.
    pub fn deregister(&self) -> Result<(), InvariantViolation> {
        let mut roster = self.roster.lock();
        if roster.active == 0 {
            return Err(InvariantViolation::DeregisterWithoutRegister);
        }
        roster.active -= 1;
        drop(roster);
        self.roster_changed.notify_all();
        Ok(())
    }

    /// Blocks the orchestrator until every registered thread deregistered.
    ///
    /// Only meaningful once the start gate has been opened or aborted;
    /// before that, players are still parked in `await_start`.
    pub fn await_completion(&self) {
        let mut roster = self.roster.lock();
        self.roster_changed.wait_while(&mut roster, |r| r.active > 0);
    }

    /// Closes the start gate for the next round.
    ///
    /// # Errors
    /// `ResetWhileActive` if any thread is still registered.
    pub fn reset_for_next_round(&self) -> Result<(), InvariantViolation> {
        let mut roster = self.roster.lock();
        if roster.active > 0 {
            return Err(InvariantViolation::ResetWhileActive {
                active: roster.active,
            });
        }
        roster.active = 0;
        roster.gate = Gate::Closed;
        Ok(())
    }

    /// Number of currently registered threads.
    pub fn active(&self) -> usize {
        self.roster.lock().active
    }

    /// True once the starting gun has fired this round.
    pub fn is_open(&self) -> bool {
        self.roster.lock().gate == Gate::Open
    }

    /// True when a new round may start: gate closed and nobody registered.
    pub fn is_ready(&self) -> bool {
        let roster = self.roster.lock();
        roster.gate == Gate::Closed && roster.active == 0
    }
}
