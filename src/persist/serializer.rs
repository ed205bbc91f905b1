//! Generic tree serializer over the object graph.

use crate::graph::ModelObject;

use super::error::PersistError;
use super::persistent::Assignment;
use super::tree::NodeData;

/// Serialize `obj` and, recursively, its children into one tree whose
/// shape mirrors the ownership graph.
#[must_use]
pub fn serialize(obj: &dyn ModelObject) -> NodeData {
    let mut data = NodeData::new(obj.type_tag());
    for name in obj.persistent_attributes() {
        match obj.attribute(name) {
            Some(value) => {
                data.attributes.insert((*name).to_string(), value);
            }
            None => log::warn!("{} declares {:?} but has no value for it", obj.type_tag(), name),
        }
    }
    data.elements = obj.children().into_iter().map(|child| serialize(child)).collect();
    data
}

/// Apply a tree produced by [`serialize`] to `obj`.
///
/// The element's type tag must match. Each attribute goes through the
/// node's setter; unknown names are logged and skipped. Each child element
/// is routed to an existing singleton child if the node has one for that
/// type, else to a freshly added child; elements the node can hold neither
/// way are logged and skipped.
pub fn deserialize(obj: &mut dyn ModelObject, data: &NodeData) -> Result<(), PersistError> {
    if data.type_tag != obj.type_tag() {
        log::error!("cannot apply a {} element to a {}", data.type_tag, obj.type_tag());
        return Err(PersistError::TypeMismatch {
            expected: obj.type_tag().to_string(),
            found: data.type_tag.clone(),
        });
    }

    for (name, value) in &data.attributes {
        if obj.set_attribute(name, value)? == Assignment::Unknown {
            log::warn!("{} has no attribute named {:?}, skipping", obj.type_tag(), name);
        }
    }

    for element in &data.elements {
        let found = match obj.child_by_tag(&element.type_tag) {
            Some(child) => {
                deserialize(child, element)?;
                true
            }
            None => false,
        };
        if found {
            continue;
        }
        match obj.add_child_by_tag(&element.type_tag) {
            Some(child) => deserialize(child, element)?,
            None => log::warn!("{} cannot hold a {} element, skipping", obj.type_tag(), element.type_tag),
        }
    }
    Ok(())
}
