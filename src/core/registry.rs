//! Tile registry: the flat arena that owns every tile of a game.
//!
//! Containers only hold `TileId`s. The registry is the single place where a
//! tile's face, container back reference and origin plate live.

use rustc_hash::FxHashMap;

use super::error::RegistryError;
use super::tile::{Color, Tile, TileId};

/// Registry of all tiles in a game.
///
/// ## Example
///
/// ```
/// use rummikub_engine::core::{Color, TileId, TileRegistry};
///
/// let mut registry = TileRegistry::new();
/// registry.create_tile(TileId::new(0), Color::Red, 5).unwrap();
///
/// // Ids are unique for the lifetime of the registry
/// assert!(registry.create_joker(TileId::new(0), Color::Black).is_err());
/// assert_eq!(registry.get(TileId::new(0)).unwrap().value(), 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    tiles: FxHashMap<TileId, Tile>,
}

impl TileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a numbered tile.
    ///
    /// Fails if a tile with the same id already exists.
    pub fn create_tile(&mut self, id: TileId, color: Color, value: u8) -> Result<TileId, RegistryError> {
        self.insert(Tile::number(id, color, value))
    }

    /// Create a joker.
    ///
    /// Fails if a tile with the same id already exists.
    pub fn create_joker(&mut self, id: TileId, color: Color) -> Result<TileId, RegistryError> {
        self.insert(Tile::joker(id, color))
    }

    fn insert(&mut self, tile: Tile) -> Result<TileId, RegistryError> {
        let id = tile.id();
        if self.tiles.contains_key(&id) {
            return Err(RegistryError::DuplicateTile(id));
        }
        self.tiles.insert(id, tile);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    /// Resolve a list of ids to tile copies, skipping unknown ids.
    #[must_use]
    pub fn resolve(&self, ids: &[TileId]) -> Vec<Tile> {
        ids.iter().filter_map(|id| self.tiles.get(id).copied()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of jokers in the registry.
    #[must_use]
    pub fn joker_count(&self) -> usize {
        self.tiles.values().filter(|t| t.is_joker()).count()
    }

    /// Iterate over all tiles (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.values_mut()
    }

    /// All ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<TileId> {
        let mut ids: Vec<_> = self.tiles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
