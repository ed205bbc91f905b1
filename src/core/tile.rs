//! Tile identity and faces.
//!
//! A `Tile` is a numbered, colored piece. Jokers are tiles whose face is not
//! stored: their effective value and color depend on the set they sit in
//! (see [`crate::rules`]).
//!
//! Tiles are not part of the object graph. They live in the
//! [`TileRegistry`](super::TileRegistry) for the whole life of a game and are
//! referenced by `TileId` from whichever container currently holds them.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::containers::ContainerRef;

/// Unique identifier for a tile.
///
/// Ids are assigned by pile construction: numbered tiles first, jokers last.
///
/// ```
/// use rummikub_engine::core::TileId;
///
/// let id = TileId::new(7);
/// assert_eq!(id.raw(), 7);
/// assert_eq!(format!("{}", id), "Tile(7)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Tile color.
///
/// `NoColor` is the sentinel a joker reports when it has no colored
/// neighbour, and always inside a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Blue,
    Red,
    Orange,
    NoColor,
}

impl Color {
    /// The four real tile colors, in pile construction order.
    pub const ALL: [Color; 4] = [Color::Black, Color::Blue, Color::Red, Color::Orange];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::NoColor => "nocolor",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a tile carries its face or derives it from context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Number,
    Joker,
}

/// A tile and its current whereabouts.
///
/// `color` and `value` never change. `container` is a non-owning back
/// reference to the container holding the tile. `origin` is set only while
/// the tile sits on the board during an unfinished turn: it names the player
/// whose plate the tile came from, so the placement can be undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    color: Color,
    value: u8,
    kind: TileKind,
    pub(crate) container: Option<ContainerRef>,
    pub(crate) origin: Option<PlayerId>,
}

impl Tile {
    /// Create a numbered tile.
    #[must_use]
    pub fn number(id: TileId, color: Color, value: u8) -> Self {
        Self {
            id,
            color,
            value,
            kind: TileKind::Number,
            container: None,
            origin: None,
        }
    }

    /// Create a joker. Its stored value is the sentinel 0.
    #[must_use]
    pub fn joker(id: TileId, color: Color) -> Self {
        Self {
            id,
            color,
            value: 0,
            kind: TileKind::Joker,
            container: None,
            origin: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Stored color. For jokers use [`crate::rules::resolve_faces`].
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Stored value (0 for jokers).
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[must_use]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    #[must_use]
    pub fn is_joker(&self) -> bool {
        self.kind == TileKind::Joker
    }

    /// Container currently holding this tile.
    #[must_use]
    pub fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    /// Player whose plate this tile left during the current turn.
    #[must_use]
    pub fn origin(&self) -> Option<PlayerId> {
        self.origin
    }

    pub(crate) fn remember_plate(&mut self, player: PlayerId) {
        self.origin = Some(player);
    }

    pub(crate) fn forget_plate(&mut self) {
        self.origin = None;
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TileKind::Number => write!(f, "{}({},{})", self.id, self.value, self.color),
            TileKind::Joker => write!(f, "Joker{}({})", self.id.0, self.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_tile() {
        let tile = Tile::number(TileId::new(3), Color::Blue, 9);
        assert_eq!(tile.value(), 9);
        assert_eq!(tile.color(), Color::Blue);
        assert!(!tile.is_joker());
        assert_eq!(tile.container(), None);
        assert_eq!(format!("{}", tile), "Tile(3)(9,blue)");
    }

    #[test]
    fn test_joker_sentinel_value() {
        let joker = Tile::joker(TileId::new(104), Color::Red);
        assert!(joker.is_joker());
        assert_eq!(joker.value(), 0);
        assert_eq!(format!("{}", joker), "Joker104(red)");
    }

    #[test]
    fn test_origin_plate() {
        let mut tile = Tile::number(TileId::new(1), Color::Black, 1);
        tile.remember_plate(PlayerId::new(2));
        assert_eq!(tile.origin(), Some(PlayerId::new(2)));
        tile.forget_plate();
        assert_eq!(tile.origin(), None);
    }

    #[test]
    fn test_color_serde_names() {
        let json = serde_json::to_string(&Color::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
        let back: Color = serde_json::from_str("\"nocolor\"").unwrap();
        assert_eq!(back, Color::NoColor);
    }
}
