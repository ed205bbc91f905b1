//! Game configuration and rule constants.
//!
//! A `GameConfig` is supplied when a game is created. Everything that is
//! part of the rules themselves (tile values, set sizes, pile population) is
//! a constant; only table-level choices are configurable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persist::PersistError;

/// Highest tile value. Values run `1..=MAX_TILE_VALUE`.
pub const MAX_TILE_VALUE: u8 = 13;

/// Copies of each (color, value) pair in the pile.
pub const COPIES_PER_TILE: usize = 2;

/// Jokers in the pile.
pub const JOKER_COUNT: usize = 2;

/// Total pile population: 2 x (13 values x 4 colors) + 2 jokers.
pub const PILE_SIZE: usize = COPIES_PER_TILE * MAX_TILE_VALUE as usize * 4 + JOKER_COUNT;

/// Smallest set that survives a commit.
pub const MIN_SET_SIZE: usize = 3;

/// A group holds at most one tile per color.
pub const MAX_GROUP_SIZE: usize = 4;

/// A run spans at most one full color cycle.
pub const MAX_RUN_SIZE: usize = MAX_TILE_VALUE as usize;

/// Tiles dealt to each player by `Game::start`.
pub const DEFAULT_HAND_SIZE: usize = 14;

/// Default seat limit.
pub const DEFAULT_MAX_PLAYERS: usize = 4;

/// Table configuration for a new game.
///
/// ## Example
///
/// ```
/// use rummikub_engine::core::GameConfig;
///
/// let config = GameConfig::new()
///     .max_players(2)
///     .hand_size(7)
///     .seed(42);
///
/// assert_eq!(config.max_players, 2);
/// assert_eq!(config.hand_size, 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum number of players that may join.
    pub max_players: usize,

    /// Tiles dealt to each player at start.
    pub hand_size: usize,

    /// Seed for pile draws.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            hand_size: DEFAULT_HAND_SIZE,
            seed: rand::random(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_players(mut self, count: usize) -> Self {
        assert!(count <= 255, "At most 255 players supported");
        self.max_players = count;
        self
    }

    pub fn hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        log::debug!("loaded game config from {}", path.as_ref().display());
        Ok(config)
    }
}
