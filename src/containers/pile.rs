//! The draw pile.

use serde_json::Value;

use crate::core::{Color, GameRng, RegistryError, TileId, TileRegistry, COPIES_PER_TILE, MAX_TILE_VALUE};
use crate::graph::{ModelObject, NodeId, NodeState};
use crate::persist::{self, Assignment, PersistError, Persistent};

use super::container::{Container, ContainerRef, TileContainer};

/// Holds every tile nobody has drawn yet.
#[derive(Debug)]
pub struct Pile {
    node: NodeState,
    tiles: TileContainer,
    next_id: u32,
}

impl Pile {
    #[must_use]
    pub fn new(parent: NodeId) -> Self {
        Self {
            node: NodeState::new(Some(parent)),
            tiles: TileContainer::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> TileId {
        let id = TileId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create the full tile population into `registry` and hold all of it.
    ///
    /// Ids run color by color, value by value, two copies each, then the
    /// black and the red joker.
    pub fn fill(&mut self, registry: &mut TileRegistry) -> Result<(), RegistryError> {
        for color in Color::ALL {
            for value in 1..=MAX_TILE_VALUE {
                for _ in 0..COPIES_PER_TILE {
                    let id = self.next_id();
                    let id = registry_create(registry, id, Some(value), color)?;
                    self.hold(registry, id);
                }
            }
        }
        for color in [Color::Black, Color::Red] {
            let id = self.next_id();
            let id = registry_create(registry, id, None, color)?;
            self.hold(registry, id);
        }
        log::debug!("pile filled with {} tiles", self.tiles.len());
        Ok(())
    }

    fn hold(&mut self, registry: &mut TileRegistry, id: TileId) {
        self.tiles.push(id);
        if let Some(tile) = registry.get_mut(id) {
            tile.container = Some(ContainerRef::Pile);
        }
    }

    /// A uniformly random tile still in the pile.
    pub fn pick(&self, rng: &mut GameRng) -> Option<TileId> {
        rng.choose(self.tiles.ids()).copied()
    }

    #[must_use]
    pub fn next_tile_id(&self) -> u32 {
        self.next_id
    }
}

fn registry_create(
    registry: &mut TileRegistry,
    id: TileId,
    value: Option<u8>,
    color: Color,
) -> Result<TileId, RegistryError> {
    match value {
        Some(value) => registry.create_tile(id, color, value),
        None => registry.create_joker(id, color),
    }
}

impl Container for Pile {
    fn container_ref(&self) -> ContainerRef {
        ContainerRef::Pile
    }

    fn membership(&self) -> &TileContainer {
        &self.tiles
    }

    fn membership_mut(&mut self) -> &mut TileContainer {
        &mut self.tiles
    }
}

const PILE_ATTRIBUTES: &[&str] = &["tiles", "nextId"];

impl Persistent for Pile {
    fn type_tag(&self) -> &'static str {
        "Pile"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        PILE_ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "tiles" => persist::encode(self.tiles.ids()),
            "nextId" => Some(Value::from(self.next_id)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError> {
        match name {
            "tiles" => self.tiles.replace(persist::decode(self.type_tag(), name, value)?),
            "nextId" => self.next_id = persist::decode(self.type_tag(), name, value)?,
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }
}

impl ModelObject for Pile {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JOKER_COUNT, PILE_SIZE};

    #[test]
    fn test_fill_population() {
        let mut registry = TileRegistry::new();
        let mut pile = Pile::new(NodeId::next());
        pile.fill(&mut registry).unwrap();

        assert_eq!(pile.size(), PILE_SIZE);
        assert_eq!(registry.len(), PILE_SIZE);
        assert_eq!(registry.joker_count(), JOKER_COUNT);
        assert_eq!(pile.next_tile_id(), 106);

        let first = registry.get(TileId::new(0)).unwrap();
        assert_eq!((first.color(), first.value()), (Color::Black, 1));
        let second = registry.get(TileId::new(1)).unwrap();
        assert_eq!((second.color(), second.value()), (Color::Black, 1));
        let last_numbered = registry.get(TileId::new(103)).unwrap();
        assert_eq!((last_numbered.color(), last_numbered.value()), (Color::Orange, 13));

        assert!(registry.get(TileId::new(104)).unwrap().is_joker());
        assert_eq!(registry.get(TileId::new(105)).unwrap().color(), Color::Red);
        assert!(registry.iter().all(|t| t.container() == Some(ContainerRef::Pile)));
    }

    #[test]
    fn test_fill_twice_rejected() {
        let mut registry = TileRegistry::new();
        Pile::new(NodeId::next()).fill(&mut registry).unwrap();
        let err = Pile::new(NodeId::next()).fill(&mut registry).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTile(TileId::new(0)));
    }

    #[test]
    fn test_pick_deterministic() {
        let mut registry = TileRegistry::new();
        let mut pile = Pile::new(NodeId::next());
        pile.fill(&mut registry).unwrap();

        let a = pile.pick(&mut GameRng::new(5));
        let b = pile.pick(&mut GameRng::new(5));
        assert_eq!(a, b);
        assert!(pile.contains_tile(a.unwrap()));

        let empty = Pile::new(NodeId::next());
        assert_eq!(empty.pick(&mut GameRng::new(5)), None);
    }
}
