//! # Tic-Tac-Toe Arena
//!
//! A fixed pool of tic-tac-toe match slots and a set of autonomous player
//! threads. In each round, every player walks the pool once, claims a seat
//! wherever one is free, and plays that match to completion against
//! whichever thread took the other seat.
//!
//! ## Modules
//! - [`barrier`]: the start/completion gates around a round
//! - [`match_state`]: one match slot, its seats and its lifecycle
//! - [`pool`]: the fixed set of slots
//! - [`turn`]: the alternating-turn protocol inside a match
//! - [`player`]: the per-thread worker loop
//! - [`arena`]: spawns a round, joins it and resets for the next
//! - [`results`]: per-player and per-match results tables
//!
//! ## Example
//! ```no_run
//! use arena::{Arena, ArenaConfig};
//!
//! let mut arena = Arena::new(ArenaConfig::new(4, 2)?.with_seed(7));
//! let report = arena.run_round()?;
//! println!("{report}");
//! arena.reset()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arena;
pub mod barrier;
pub mod config;
pub mod error;
pub mod games;
pub mod logging;
pub mod match_state;
pub mod player;
pub mod pool;
pub mod random;
pub mod results;
pub mod turn;

pub use arena::Arena;
pub use barrier::RoundBarrier;
pub use config::ArenaConfig;
pub use error::{ArenaError, ConfigError, InvariantViolation};
pub use match_state::{Lifecycle, MatchSnapshot, MatchState, PlayerId, Seat, SeatClaim};
pub use player::{Player, PlayerStats};
pub use pool::MatchPool;
pub use random::RandomMoveSelector;
pub use results::{Inconsistency, RoundReport, Totals};
pub use turn::MatchOutcome;
