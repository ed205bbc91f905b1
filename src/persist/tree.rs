//! The nested attribute tree.
//!
//! One `NodeData` per object-graph node: its type tag, its persistent
//! attributes flattened alongside, and its children under `elements`.
//!
//! ```json
//! {"type":"Player","name":"ann","elements":[{"type":"Plate","tiles":[3,17]}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::PersistError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<NodeData>,
}

impl NodeData {
    #[must_use]
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            attributes: Map::new(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// First child element of type `tag`.
    #[must_use]
    pub fn element(&self, tag: &str) -> Option<&NodeData> {
        self.elements.iter().find(|e| e.type_tag == tag)
    }

    pub fn elements_of<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a NodeData> + 'a {
        self.elements.iter().filter(move |e| e.type_tag == tag)
    }

    /// Single-line JSON, the save-file and wire format.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(text)?)
    }
}
