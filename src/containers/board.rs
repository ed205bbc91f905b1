//! The shared board: an unordered collection of sets.

use serde_json::Value;

use crate::core::{PlayerId, TileId, TileRegistry};
use crate::graph::{ModelObject, NodeId, NodeState};
use crate::persist::{Assignment, PersistError, Persistent};
use crate::pubsub::MessageQueue;

use super::container::Container;
use super::set::TileSet;

/// What a turn's clean-up does to the tiles on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanUp {
    /// Tiles in valid sets; they forget their origin plate.
    pub permanent: Vec<TileId>,
    /// Tiles to move back to the plate they came from.
    pub returns: Vec<(TileId, PlayerId)>,
}

#[derive(Debug)]
pub struct Board {
    node: NodeState,
    sets: Vec<TileSet>,
}

impl Board {
    #[must_use]
    pub fn new(parent: NodeId) -> Self {
        Self {
            node: NodeState::new(Some(parent)),
            sets: Vec::new(),
        }
    }

    #[must_use]
    pub fn sets(&self) -> &[TileSet] {
        &self.sets
    }

    #[must_use]
    pub fn set(&self, id: NodeId) -> Option<&TileSet> {
        self.sets.iter().find(|s| s.id() == id)
    }

    pub(crate) fn set_mut(&mut self, id: NodeId) -> Option<&mut TileSet> {
        self.sets.iter_mut().find(|s| s.id() == id)
    }

    /// Attach an empty set and announce it.
    pub(crate) fn new_set(&mut self, queue: &mut MessageQueue) -> NodeId {
        let set = TileSet::new(self.node.id());
        let id = set.id();
        self.sets.push(set);
        self.node.announce_child(id, queue);
        id
    }

    /// Number of non-empty sets that would fail a commit.
    #[must_use]
    pub fn validate_sets(&self, registry: &TileRegistry) -> usize {
        let invalid = self
            .sets
            .iter()
            .filter(|s| !s.is_empty() && !s.is_valid(registry))
            .count();
        log::debug!("validate_sets: {} invalid of {}", invalid, self.sets.len());
        invalid
    }

    /// Decide the fate of every tile on the board.
    ///
    /// With `validate`, tiles of valid sets become permanent. Every other
    /// tile that remembers an origin plate goes back to it; tiles without
    /// one stay where they are.
    #[must_use]
    pub fn clean_up_plan(&self, registry: &TileRegistry, validate: bool) -> CleanUp {
        let mut plan = CleanUp::default();
        for set in self.sets.iter().filter(|s| !s.is_empty()) {
            if validate && set.is_valid(registry) {
                plan.permanent.extend_from_slice(set.membership().ids());
            } else {
                plan.returns.extend(
                    registry
                        .resolve(set.membership().ids())
                        .into_iter()
                        .filter_map(|t| t.origin().map(|player| (t.id(), player))),
                );
            }
        }
        plan
    }

    /// Drop every empty set. Returns how many were removed.
    pub(crate) fn prune_empty(&mut self, queue: &mut MessageQueue) -> usize {
        let before = self.sets.len();
        self.sets.retain(|s| !s.is_empty());
        let pruned = before - self.sets.len();
        if pruned > 0 {
            self.node.set_modified(queue);
        }
        pruned
    }

    /// Every tile on the board.
    #[must_use]
    pub fn tile_ids(&self) -> Vec<TileId> {
        self.sets
            .iter()
            .flat_map(|s| s.membership().ids().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn describe(&self, registry: &TileRegistry) -> String {
        let mut out = format!("{} ({} sets):", self.node.id(), self.sets.len());
        for set in &self.sets {
            out.push_str("\n  ");
            out.push_str(&set.describe(registry));
        }
        out
    }
}

impl Persistent for Board {
    fn type_tag(&self) -> &'static str {
        "Board"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_attribute(&mut self, _name: &str, _value: &Value) -> Result<Assignment, PersistError> {
        Ok(Assignment::Unknown)
    }
}

impl ModelObject for Board {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }

    fn children(&self) -> Vec<&dyn ModelObject> {
        self.sets.iter().map(|s| s as &dyn ModelObject).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn ModelObject> {
        self.sets.iter_mut().map(|s| s as &mut dyn ModelObject).collect()
    }

    fn add_child_by_tag(&mut self, tag: &str) -> Option<&mut dyn ModelObject> {
        if tag != "Set" {
            return None;
        }
        self.sets.push(TileSet::new(self.node.id()));
        self.sets.last_mut().map(|s| s as &mut dyn ModelObject)
    }
}
