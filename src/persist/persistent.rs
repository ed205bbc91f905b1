//! Declared persistent attributes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::PersistError;

/// Outcome of assigning one attribute during deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assignment {
    Applied,
    /// The node declares no attribute of that name; the value is skipped.
    Unknown,
}

/// A node that declares, by name, which of its attributes are persistent.
///
/// The declared names are the keys written next to `type` in the node's
/// tree element. `set_attribute` is the typed setter the deserializer calls
/// for each key it finds.
pub trait Persistent {
    /// Type tag written as `type`; must match on deserialization.
    fn type_tag(&self) -> &'static str;

    fn persistent_attributes(&self) -> &'static [&'static str];

    fn attribute(&self, name: &str) -> Option<Value>;

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError>;
}

/// Encode an attribute value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(err) => {
            log::error!("cannot encode attribute: {}", err);
            None
        }
    }
}

/// Decode the value of attribute `name` of a `type_tag` node.
pub fn decode<T: DeserializeOwned>(type_tag: &str, name: &str, value: &Value) -> Result<T, PersistError> {
    T::deserialize(value).map_err(|err| PersistError::InvalidAttribute {
        type_tag: type_tag.to_string(),
        name: name.to_string(),
        reason: err.to_string(),
    })
}
