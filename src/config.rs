//! # Arena Configuration
//!
//! Validated sizes for one arena run. Raw counts come from the command line
//! or the console prompts as signed integers so that a negative match count
//! can be reported instead of failing to parse.

use crate::error::ConfigError;

/// Minimum number of players needed for any match to start.
pub const MIN_PLAYERS: usize = 2;

/// Sizes and seeding for an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of player threads spawned each round
    pub players: usize,
    /// Number of match slots in the pool
    pub games: usize,
    /// Base seed for every player's move selector. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl ArenaConfig {
    /// Validates raw counts into a configuration.
    ///
    /// # Errors
    /// `TooFewPlayers` if `players < 2`, `NegativeGames` if `games < 0`.
    pub fn new(players: i64, games: i64) -> Result<Self, ConfigError> {
        if players < MIN_PLAYERS as i64 {
            return Err(ConfigError::TooFewPlayers(players));
        }
        if games < 0 {
            return Err(ConfigError::NegativeGames(games));
        }
        Ok(Self {
            players: players as usize,
            games: games as usize,
            seed: None,
        })
    }

    /// Fixes the base seed so rounds replay deterministically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ArenaConfig::new(4, 2).unwrap();
        assert_eq!(config.players, 4);
        assert_eq!(config.games, 2);
        assert_eq!(config.seed, None);
        assert_eq!(config.with_seed(7).seed, Some(7));
    }

    #[test]
    fn test_zero_games_is_allowed() {
        assert!(ArenaConfig::new(2, 0).is_ok());
    }

    #[test]
    fn test_rejects_too_few_players() {
        assert_eq!(ArenaConfig::new(1, 3), Err(ConfigError::TooFewPlayers(1)));
        assert_eq!(ArenaConfig::new(-5, 3), Err(ConfigError::TooFewPlayers(-5)));
    }

    #[test]
    fn test_rejects_negative_games() {
        assert_eq!(ArenaConfig::new(3, -1), Err(ConfigError::NegativeGames(-1)));
    }
}
