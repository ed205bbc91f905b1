//! A set on the board: membership plus evaluation order and a position.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Tile, TileId, TileRegistry};
use crate::graph::{ModelObject, NodeId, NodeState};
use crate::persist::{self, Assignment, PersistError, Persistent};
use crate::rules::{self, SetType};

use super::container::{Container, ContainerRef, TileContainer};

/// Position of a set on the board, in board coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPos {
    pub x: i32,
    pub y: i32,
}

impl BoardPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An ordered run or group under construction.
///
/// `order` and membership always hold the same ids. Placement splices into
/// `order` at the fit position; removal takes the id out of both.
#[derive(Debug)]
pub struct TileSet {
    node: NodeState,
    tiles: TileContainer,
    order: Vec<TileId>,
    pos: Option<BoardPos>,
}

impl TileSet {
    #[must_use]
    pub fn new(parent: NodeId) -> Self {
        Self {
            node: NodeState::new(Some(parent)),
            tiles: TileContainer::new(),
            order: Vec::new(),
            pos: None,
        }
    }

    #[must_use]
    pub fn order(&self) -> &[TileId] {
        &self.order
    }

    #[must_use]
    pub fn position(&self) -> Option<BoardPos> {
        self.pos
    }

    /// Returns whether the position changed.
    pub(crate) fn set_position(&mut self, pos: BoardPos) -> bool {
        if self.pos == Some(pos) {
            return false;
        }
        self.pos = Some(pos);
        true
    }

    /// Tiles in evaluation order.
    ///
    /// # Panics
    ///
    /// Panics if order and membership diverge, or if a member is missing
    /// from `registry`: both mean the graph is corrupt.
    #[must_use]
    pub fn ordered_tiles(&self, registry: &TileRegistry) -> Vec<Tile> {
        assert_eq!(
            self.order.len(),
            self.tiles.len(),
            "{}: order {:?} and membership {:?} inconsistent",
            self.node.id(),
            self.order,
            self.tiles.ids()
        );
        self.order
            .iter()
            .map(|id| {
                assert!(
                    self.tiles.contains(*id),
                    "{}: ordered {} is not a member",
                    self.node.id(),
                    id
                );
                match registry.get(*id) {
                    Some(tile) => *tile,
                    None => panic!("{}: member {} not registered", self.node.id(), id),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn set_type(&self, registry: &TileRegistry) -> SetType {
        rules::set_type(&self.ordered_tiles(registry))
    }

    /// At least three tiles and not `Invalid`.
    #[must_use]
    pub fn is_valid(&self, registry: &TileRegistry) -> bool {
        rules::is_valid_set(&self.ordered_tiles(registry))
    }

    /// Order and membership hold the same ids, each once.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.order.len() == self.tiles.len()
            && self.order.iter().all(|id| self.tiles.contains(*id))
            && self.tiles.ids().iter().all(|id| self.order.contains(id))
    }

    /// Values in order, jokers resolved, for display.
    #[must_use]
    pub fn describe(&self, registry: &TileRegistry) -> String {
        let tiles = self.ordered_tiles(registry);
        let set_type = rules::set_type(&tiles);
        let faces = rules::resolve_faces(&tiles, set_type);
        let values: Vec<String> = tiles
            .iter()
            .zip(faces)
            .map(|(tile, face)| {
                if tile.is_joker() {
                    format!("J{}", face.value)
                } else {
                    face.value.to_string()
                }
            })
            .collect();
        format!("{} {} [{}]", self.node.id(), set_type, values.join(" "))
    }
}

impl Container for TileSet {
    fn container_ref(&self) -> ContainerRef {
        ContainerRef::Set(self.node.id())
    }

    fn membership(&self) -> &TileContainer {
        &self.tiles
    }

    fn membership_mut(&mut self) -> &mut TileContainer {
        &mut self.tiles
    }

    fn tile_fit_position(&self, registry: &TileRegistry, tile: &Tile, pos: Option<usize>) -> usize {
        rules::fit_position(&self.ordered_tiles(registry), tile, pos)
    }

    fn insert_tile(&mut self, tile: TileId, fit: usize) {
        if self.tiles.push(tile) {
            let index = fit.saturating_sub(1).min(self.order.len());
            self.order.insert(index, tile);
        }
    }

    fn remove_tile(&mut self, tile: TileId) -> bool {
        if !self.tiles.remove(tile) {
            return false;
        }
        self.order.retain(|id| *id != tile);
        true
    }
}

const SET_ATTRIBUTES: &[&str] = &["tiles", "order", "pos"];

impl Persistent for TileSet {
    fn type_tag(&self) -> &'static str {
        "Set"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        SET_ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "tiles" => persist::encode(self.tiles.ids()),
            "order" => persist::encode(&self.order),
            "pos" => persist::encode(&self.pos),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError> {
        match name {
            "tiles" => self.tiles.replace(persist::decode(self.type_tag(), name, value)?),
            "order" => self.order = persist::decode(self.type_tag(), name, value)?,
            "pos" => self.pos = persist::decode(self.type_tag(), name, value)?,
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }
}

impl ModelObject for TileSet {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }
}
