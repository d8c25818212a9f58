//! # Match Slots
//!
//! One reusable match: who sits where, the board, whose turn it is and how
//! far the match has progressed.
//!
//! Each slot owns two locks and never touches another slot's:
//! - the occupancy lock guards the seat table used for matchmaking;
//! - the gameplay lock guards the board, the turn and the lifecycle, and is
//!   paired with the condition variable both participants wait on.
//!
//! When both are needed the occupancy lock is taken first.

use crate::error::InvariantViolation;
use crate::games::tictactoe::{Board, Cell, Mark, Verdict};
use crate::random::RandomMoveSelector;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;

/// Player identifier, the index of the player in the arena.
pub type PlayerId = usize;

/// One of the two roles in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    /// Plays `X` and moves first
    First,
    /// Plays `O` and moves second
    Second,
}

impl Seat {
    pub fn mark(self) -> Mark {
        match self {
            Seat::First => Mark::X,
            Seat::Second => Mark::O,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => write!(f, "'X'"),
            Seat::Second => write!(f, "'O'"),
        }
    }
}

/// Lifecycle of a match within one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Zero or one seat filled
    AwaitingPlayers,
    /// Both seats filled; the board is changing
    InProgress,
    /// The given seat completed a line
    Won(Seat),
    /// Board full without a line
    Draw,
    /// Torn down after an invariant violation somewhere in the round
    Aborted,
}

impl Lifecycle {
    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::Won(_) | Lifecycle::Draw | Lifecycle::Aborted)
    }

    /// True once the match has had both players, whatever its result.
    pub fn was_started(self) -> bool {
        matches!(self, Lifecycle::InProgress | Lifecycle::Won(_) | Lifecycle::Draw)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::AwaitingPlayers => write!(f, "awaiting players"),
            Lifecycle::InProgress => write!(f, "in progress"),
            Lifecycle::Won(seat) => write!(f, "won by {}", seat),
            Lifecycle::Draw => write!(f, "a draw"),
            Lifecycle::Aborted => write!(f, "aborted"),
        }
    }
}

/// Result of a seat request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatClaim {
    /// The caller now holds this seat
    Seated(Seat),
    /// Both seats are taken (or the round was aborted); nothing changed
    Full,
}

/// A single applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub seat: Seat,
    pub cell: Cell,
    /// Lifecycle right after the move
    pub lifecycle: Lifecycle,
}

/// Seat table guarded by the occupancy lock.
#[derive(Debug, Default)]
struct SeatTable {
    occupancy: u8,
    first: Option<PlayerId>,
    second: Option<PlayerId>,
}

impl SeatTable {
    fn holder(&self, seat: Seat) -> Option<PlayerId> {
        match seat {
            Seat::First => self.first,
            Seat::Second => self.second,
        }
    }
}

/// Gameplay data guarded by the gameplay lock.
#[derive(Debug)]
pub(crate) struct Game {
    pub(crate) board: Board,
    pub(crate) turn: Seat,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) last_move: Option<(Seat, Cell)>,
    pub(crate) moves: usize,
}

impl Game {
    fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Seat::First,
            lifecycle: Lifecycle::AwaitingPlayers,
            last_move: None,
            moves: 0,
        }
    }

    /// Places one uniformly chosen mark for `seat` and advances the turn.
    ///
    /// Fails without touching the board if the match is not in progress or
    /// it is not `seat`'s turn.
    pub(crate) fn apply_move(
        &mut self,
        game_number: usize,
        seat: Seat,
        selector: &mut RandomMoveSelector,
    ) -> Result<MoveRecord, InvariantViolation> {
        if self.lifecycle != Lifecycle::InProgress {
            return Err(InvariantViolation::NotInProgress {
                game: game_number,
                lifecycle: self.lifecycle,
            });
        }
        if self.turn != seat {
            return Err(InvariantViolation::OutOfTurn {
                game: game_number,
                seat,
                expected: self.turn,
            });
        }
        let cell = selector
            .choose(&self.board.empty_cells())
            .ok_or(InvariantViolation::NoLegalMove { game: game_number })?;
        let mark = seat.mark();
        if !self.board.place(cell, mark) {
            return Err(InvariantViolation::NoLegalMove { game: game_number });
        }
        self.moves += 1;
        self.last_move = Some((seat, cell));
        self.turn = seat.other();
        self.lifecycle = match self.board.evaluate(cell, mark) {
            Verdict::Won => Lifecycle::Won(seat),
            Verdict::Draw => Lifecycle::Draw,
            Verdict::Ongoing => Lifecycle::InProgress,
        };
        Ok(MoveRecord {
            seat,
            cell,
            lifecycle: self.lifecycle,
        })
    }

    /// Moves a live match to `Aborted`. Finished matches keep their result.
    pub(crate) fn abort(&mut self) -> bool {
        if self.lifecycle.is_terminal() {
            false
        } else {
            self.lifecycle = Lifecycle::Aborted;
            true
        }
    }
}

/// Point-in-time copy of a match, for reporting and assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    /// 1-based match number
    pub number: usize,
    pub first: Option<PlayerId>,
    pub second: Option<PlayerId>,
    pub occupancy: u8,
    pub board: Board,
    pub turn: Seat,
    pub lifecycle: Lifecycle,
    pub last_move: Option<(Seat, Cell)>,
    pub moves: usize,
}

impl MatchSnapshot {
    pub fn holder(&self, seat: Seat) -> Option<PlayerId> {
        match seat {
            Seat::First => self.first,
            Seat::Second => self.second,
        }
    }
}

/// One match slot and its private synchronization.
#[derive(Debug)]
pub struct MatchState {
    number: usize,
    seats: Mutex<SeatTable>,
    game: Mutex<Game>,
    turn_changed: Condvar,
}

impl MatchState {
    /// Creates an empty slot with a 1-based display number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            seats: Mutex::new(SeatTable::default()),
            game: Mutex::new(Game::new()),
            turn_changed: Condvar::new(),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Number of occupied seats, read under the occupancy lock.
    pub fn occupancy(&self) -> u8 {
        self.seats.lock().occupancy
    }

    pub fn holder(&self, seat: Seat) -> Option<PlayerId> {
        self.seats.lock().holder(seat)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.game.lock().lifecycle
    }

    /// Atomically checks occupancy and takes the next free seat.
    ///
    /// The first claimant sits in the second-mover seat and the second
    /// claimant in the first-mover seat. The second claim also starts the
    /// match and wakes the waiting occupant. `Full` when both seats are
    /// taken or the match has already been aborted.
    pub fn try_claim_seat(&self, player: PlayerId) -> SeatClaim {
        let mut seats = self.seats.lock();
        if seats.occupancy >= 2 {
            return SeatClaim::Full;
        }
        let mut game = self.game.lock();
        if game.lifecycle == Lifecycle::Aborted {
            return SeatClaim::Full;
        }
        let seat = if seats.occupancy == 0 {
            seats.second = Some(player);
            Seat::Second
        } else {
            seats.first = Some(player);
            game.lifecycle = Lifecycle::InProgress;
            Seat::First
        };
        seats.occupancy += 1;
        drop(game);
        drop(seats);
        if seat == Seat::First {
            self.turn_changed.notify_all();
        }
        SeatClaim::Seated(seat)
    }

    /// Runs a single turn for `seat` without waiting.
    ///
    /// A rejected move aborts the match and wakes the other participant, so
    /// a caller acting out of turn never leaves its opponent blocked.
    pub fn take_turn(
        &self,
        seat: Seat,
        selector: &mut RandomMoveSelector,
    ) -> Result<MoveRecord, InvariantViolation> {
        let mut game = self.game.lock();
        let result = game.apply_move(self.number, seat, selector);
        if result.is_err() {
            game.abort();
        }
        drop(game);
        self.turn_changed.notify_all();
        result
    }

    /// Forces a live match into `Aborted` and wakes anyone waiting on it.
    pub fn abort(&self) -> bool {
        let changed = self.game.lock().abort();
        self.turn_changed.notify_all();
        changed
    }

    /// Copies the current state, taking both locks in the documented order.
    pub fn snapshot(&self) -> MatchSnapshot {
        let seats = self.seats.lock();
        let game = self.game.lock();
        MatchSnapshot {
            number: self.number,
            first: seats.first,
            second: seats.second,
            occupancy: seats.occupancy,
            board: game.board.clone(),
            turn: game.turn,
            lifecycle: game.lifecycle,
            last_move: game.last_move,
            moves: game.moves,
        }
    }

    /// Returns the slot to a fresh `AwaitingPlayers` state.
    ///
    /// Takes `&mut self`: nobody else can hold a reference while this runs.
    pub fn reset(&mut self) {
        *self.seats.get_mut() = SeatTable::default();
        *self.game.get_mut() = Game::new();
    }

    pub(crate) fn lock_game(&self) -> MutexGuard<'_, Game> {
        self.game.lock()
    }

    /// Blocks while `blocked` holds, re-checking after every wake.
    pub(crate) fn wait_while<F>(&self, game: &mut MutexGuard<'_, Game>, blocked: F)
    where
        F: FnMut(&mut Game) -> bool,
    {
        self.turn_changed.wait_while(game, blocked);
    }

    pub(crate) fn notify_all(&self) {
        self.turn_changed.notify_all();
    }
}
