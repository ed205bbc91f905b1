//! Core types: tiles, the tile registry, players, RNG, configuration.
//!
//! These are the leaf building blocks. Nothing here knows about sets,
//! the board or turns.

pub mod tile;
pub mod registry;
pub mod player;
pub mod rng;
pub mod config;
mod error;

pub use tile::{Color, Tile, TileId, TileKind};
pub use registry::TileRegistry;
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState};
pub use config::{
    GameConfig, COPIES_PER_TILE, DEFAULT_HAND_SIZE, DEFAULT_MAX_PLAYERS, JOKER_COUNT, MAX_GROUP_SIZE,
    MAX_RUN_SIZE, MAX_TILE_VALUE, MIN_SET_SIZE, PILE_SIZE,
};
pub use error::RegistryError;
