use crate::match_state::{Lifecycle, Seat};
use thiserror::Error;

/// Rejected arena configuration. The round never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("requires at least two players, got {0}")]
    TooFewPlayers(i64),

    #[error("match count must not be negative, got {0}")]
    NegativeGames(i64),
}

/// A broken synchronization invariant. These are never retried; the round
/// is torn down and the violation is reported to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("game {game}: {seat} tried to move while it was {expected}'s turn")]
    OutOfTurn { game: usize, seat: Seat, expected: Seat },

    #[error("game {game}: move attempted while the match is {lifecycle}")]
    NotInProgress { game: usize, lifecycle: Lifecycle },

    #[error("game {game}: no empty cell left for a match still in progress")]
    NoLegalMove { game: usize },

    #[error("start gate opened with {registered} of {expected} players registered")]
    StartBeforeRegistration { registered: usize, expected: usize },

    #[error("deregister called with no active players")]
    DeregisterWithoutRegister,

    #[error("barrier reset while {active} players are still active")]
    ResetWhileActive { active: usize },

    #[error("player registered after the start gate was released")]
    LateRegistration,

    #[error("round {next} started before the arena was reset")]
    RoundNotReset { next: usize },

    #[error("round aborted before the start gate opened")]
    RoundAborted,

    #[error("game {game}: match aborted after an invariant violation elsewhere")]
    MatchAborted { game: usize },
}

/// Top-level error returned by the orchestrator and the binaries.
#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("player {player} thread panicked")]
    WorkerPanicked { player: usize },

    #[error("failed to spawn thread for player {player}: {source}")]
    Spawn {
        player: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("console prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl ArenaError {
    /// Process exit code: environment problems map to 1, broken invariants
    /// and panics to 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            ArenaError::Config(_) | ArenaError::Prompt(_) | ArenaError::Spawn { .. } => 1,
            ArenaError::Invariant(_) | ArenaError::WorkerPanicked { .. } => 2,
        }
    }
}

/// Convenience Result type for arena operations
pub type Result<T> = std::result::Result<T, ArenaError>;
