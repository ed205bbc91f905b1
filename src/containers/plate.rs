//! A player's private rack.

use serde_json::Value;

use crate::core::PlayerId;
use crate::graph::{ModelObject, NodeId, NodeState};
use crate::persist::{self, Assignment, PersistError, Persistent};

use super::container::{Container, ContainerRef, TileContainer};

#[derive(Debug)]
pub struct Plate {
    node: NodeState,
    owner: PlayerId,
    tiles: TileContainer,
}

impl Plate {
    #[must_use]
    pub fn new(parent: NodeId, owner: PlayerId) -> Self {
        Self {
            node: NodeState::new(Some(parent)),
            owner,
            tiles: TileContainer::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }
}

impl Container for Plate {
    fn container_ref(&self) -> ContainerRef {
        ContainerRef::Plate(self.owner)
    }

    fn membership(&self) -> &TileContainer {
        &self.tiles
    }

    fn membership_mut(&mut self) -> &mut TileContainer {
        &mut self.tiles
    }
}

impl Persistent for Plate {
    fn type_tag(&self) -> &'static str {
        "Plate"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        &["tiles"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "tiles" => persist::encode(self.tiles.ids()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError> {
        match name {
            "tiles" => {
                self.tiles.replace(persist::decode(self.type_tag(), name, value)?);
                Ok(Assignment::Applied)
            }
            _ => Ok(Assignment::Unknown),
        }
    }
}

impl ModelObject for Plate {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }
}
