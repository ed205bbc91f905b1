//! A seat at the table and its plate.

use serde_json::Value;

use crate::containers::Plate;
use crate::core::PlayerId;
use crate::graph::{ModelObject, NodeId, NodeState};
use crate::persist::{self, Assignment, PersistError, Persistent};

#[derive(Debug)]
pub struct Player {
    node: NodeState,
    id: PlayerId,
    name: Option<String>,
    plate: Plate,
}

impl Player {
    #[must_use]
    pub fn new(game: NodeId, id: PlayerId, name: Option<String>) -> Self {
        let node = NodeState::new(Some(game));
        let plate = Plate::new(node.id(), id);
        Self { node, id, name, plate }
    }

    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn plate(&self) -> &Plate {
        &self.plate
    }

    pub(crate) fn plate_mut(&mut self) -> &mut Plate {
        &mut self.plate
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "player {} ({})", name, self.id.0),
            None => write!(f, "player {}", self.id.0),
        }
    }
}

impl Persistent for Player {
    fn type_tag(&self) -> &'static str {
        "Player"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => persist::encode(&self.name),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError> {
        match name {
            "name" => {
                self.name = persist::decode(self.type_tag(), name, value)?;
                Ok(Assignment::Applied)
            }
            _ => Ok(Assignment::Unknown),
        }
    }
}

impl ModelObject for Player {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }

    fn children(&self) -> Vec<&dyn ModelObject> {
        vec![&self.plate as &dyn ModelObject]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn ModelObject> {
        vec![&mut self.plate as &mut dyn ModelObject]
    }

    fn child_by_tag(&mut self, tag: &str) -> Option<&mut dyn ModelObject> {
        match tag {
            "Plate" => Some(&mut self.plate as &mut dyn ModelObject),
            _ => None,
        }
    }
}
