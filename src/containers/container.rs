//! Container addressing, membership lists and the `Container` trait.

use crate::core::{Color, PlayerId, Tile, TileId, TileRegistry};
use crate::graph::{ModelObject, NodeId};

/// Address of a container within one game.
///
/// `Board` is a pseudo-target: a tile moved there lands in a brand-new set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    Pile,
    Board,
    Plate(PlayerId),
    Set(NodeId),
}

impl ContainerRef {
    #[must_use]
    pub fn is_set(self) -> bool {
        matches!(self, ContainerRef::Set(_))
    }
}

impl std::fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerRef::Pile => f.write_str("Pile"),
            ContainerRef::Board => f.write_str("Board"),
            ContainerRef::Plate(player) => write!(f, "Plate({})", player.0),
            ContainerRef::Set(id) => write!(f, "Set({})", id.0),
        }
    }
}

/// Membership list of a container.
///
/// Order here is arrival order and carries no meaning; sets keep their
/// evaluation order separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileContainer {
    tiles: Vec<TileId>,
}

impl TileContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> &[TileId] {
        &self.tiles
    }

    /// Add `id` unless already present. Returns whether it was added.
    pub fn push(&mut self, id: TileId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.tiles.push(id);
        true
    }

    pub fn remove(&mut self, id: TileId) -> bool {
        match self.tiles.iter().position(|t| *t == id) {
            Some(index) => {
                self.tiles.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn replace(&mut self, tiles: Vec<TileId>) {
        self.tiles = tiles;
    }

    /// First member with this face.
    #[must_use]
    pub fn find_tile(&self, registry: &TileRegistry, value: u8, color: Color) -> Option<TileId> {
        registry
            .resolve(&self.tiles)
            .into_iter()
            .find(|t| t.value() == value && t.color() == color)
            .map(|t| t.id())
    }

    #[must_use]
    pub fn sorted_by_value(&self, registry: &TileRegistry) -> Vec<Tile> {
        let mut tiles = registry.resolve(&self.tiles);
        tiles.sort_by_key(|t| (t.value(), t.id()));
        tiles
    }

    /// Members grouped by color, ascending value within each color.
    #[must_use]
    pub fn grouped_by_color(&self, registry: &TileRegistry) -> Vec<Tile> {
        let mut tiles = self.sorted_by_value(registry);
        tiles.sort_by_key(|t| t.color());
        tiles
    }

    /// `color: values` lines, one per color present.
    #[must_use]
    pub fn describe(&self, registry: &TileRegistry) -> String {
        let mut out = String::new();
        let mut current = None;
        for tile in self.grouped_by_color(registry) {
            if current != Some(tile.color()) {
                current = Some(tile.color());
                out.push_str(&format!("\n{}:", tile.color()));
            }
            out.push_str(&format!(" {}", tile.value()));
        }
        out
    }
}

/// A model object holding tiles.
///
/// The default placement rule accepts any tile at position 1; sets
/// override it with the rule engine.
pub trait Container: ModelObject {
    fn container_ref(&self) -> ContainerRef;

    fn membership(&self) -> &TileContainer;

    fn membership_mut(&mut self) -> &mut TileContainer;

    /// 1-based position at which `tile` would join; 0 means rejected.
    fn tile_fit_position(&self, _registry: &TileRegistry, _tile: &Tile, _pos: Option<usize>) -> usize {
        1
    }

    /// Record `tile` as a member at the position returned by
    /// `tile_fit_position`.
    fn insert_tile(&mut self, tile: TileId, _fit: usize) {
        self.membership_mut().push(tile);
    }

    fn remove_tile(&mut self, tile: TileId) -> bool {
        self.membership_mut().remove(tile)
    }

    fn contains_tile(&self, tile: TileId) -> bool {
        self.membership().contains(tile)
    }

    fn size(&self) -> usize {
        self.membership().len()
    }

    fn is_empty(&self) -> bool {
        self.membership().is_empty()
    }
}
