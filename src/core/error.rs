use thiserror::Error;

use super::tile::TileId;

/// Errors raised by the tile registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tile with this id already exists; tile ids are unique per game.
    #[error("tile {0} already registered")]
    DuplicateTile(TileId),
}
