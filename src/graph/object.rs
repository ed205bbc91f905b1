//! The `ModelObject` trait and the generic graph walks built on it.

use crate::persist::Persistent;
use crate::pubsub::{Event, Message, MessageQueue, Payload};

use super::node::{NodeId, NodeState};

/// A non-tile entity of the game's ownership tree.
///
/// Implementors own their children directly and expose them through
/// `children`/`children_mut`; the tile registry is not part of the tree.
/// `child_by_tag` and `add_child_by_tag` tell the deserializer how to reach
/// a child for a given element type: singleton children are looked up,
/// collection members are created.
pub trait ModelObject: Persistent {
    fn node(&self) -> &NodeState;

    fn node_mut(&mut self) -> &mut NodeState;

    fn children(&self) -> Vec<&dyn ModelObject> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn ModelObject> {
        Vec::new()
    }

    /// Existing singleton child for an element of type `tag`.
    fn child_by_tag(&mut self, _tag: &str) -> Option<&mut dyn ModelObject> {
        None
    }

    /// Freshly attached child for an element of type `tag`.
    fn add_child_by_tag(&mut self, _tag: &str) -> Option<&mut dyn ModelObject> {
        None
    }

    fn id(&self) -> NodeId {
        self.node().id()
    }
}

/// Whether `obj` (or, when `recursive`, any descendant) is flagged.
#[must_use]
pub fn is_modified(obj: &dyn ModelObject, recursive: bool) -> bool {
    obj.node().is_modified()
        || (recursive && obj.children().into_iter().any(|child| is_modified(child, true)))
}

/// Clear the flag of `obj`, and of every descendant when `recursive`.
pub fn clear_modified(obj: &mut dyn ModelObject, recursive: bool) {
    obj.node_mut().clear_modified();
    if recursive {
        for child in obj.children_mut() {
            clear_modified(child, true);
        }
    }
}

/// Ids of every flagged node under `obj`, in pre-order.
#[must_use]
pub fn modified_objects(obj: &dyn ModelObject) -> Vec<NodeId> {
    let mut found = Vec::new();
    collect_modified(obj, &mut found);
    found
}

fn collect_modified(obj: &dyn ModelObject, found: &mut Vec<NodeId>) {
    if obj.node().is_modified() {
        found.push(obj.id());
    }
    for child in obj.children() {
        collect_modified(child, found);
    }
}

#[must_use]
pub fn find_node<'a>(root: &'a dyn ModelObject, id: NodeId) -> Option<&'a dyn ModelObject> {
    if root.id() == id {
        return Some(root);
    }
    root.children().into_iter().find_map(|child| find_node(child, id))
}

pub fn find_node_mut<'a>(root: &'a mut dyn ModelObject, id: NodeId) -> Option<&'a mut dyn ModelObject> {
    if root.id() == id {
        return Some(root);
    }
    for child in root.children_mut() {
        if let Some(found) = find_node_mut(child, id) {
            return Some(found);
        }
    }
    None
}

/// Flag node `id` under `root`. Returns false if no such node exists.
pub fn set_modified(root: &mut dyn ModelObject, id: NodeId, queue: &mut MessageQueue) -> bool {
    match find_node_mut(root, id) {
        Some(node) => {
            node.node_mut().set_modified(queue);
            true
        }
        None => false,
    }
}

/// Deliver `message` to node `to` under `root`.
///
/// A child's modification flags the parent and is re-published upward
/// naming the child. A modification whose child is gone, or no longer
/// flagged (a commit cleared it in between), is dropped. Returns false if
/// `to` is not a node of this tree.
pub fn handle_node_message(
    root: &mut dyn ModelObject,
    to: NodeId,
    message: &Message,
    queue: &mut MessageQueue,
) -> bool {
    let Some(node) = find_node_mut(root, to) else {
        return false;
    };

    match (message.event, &message.payload) {
        (Event::ObjectModified, Payload::Object { object, .. }) => {
            let live = node
                .children()
                .into_iter()
                .any(|child| child.id() == *object && child.node().is_modified());
            if live {
                node.node_mut().mark_modified(Some(*object), queue);
            } else {
                log::debug!("{} dropping stale modification of {}", to, object);
            }
        }
        (event, _) => log::debug!("{} ignoring {}", to, event),
    }
    true
}
