//! Node identity and per-node state.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::pubsub::{Event, MessageQueue, Payload, PubSubError, Publisher, SubscriberId};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(0);

/// Events every node publishes.
pub const NODE_EVENTS: [Event; 2] = [Event::ObjectModified, Event::NewChild];

/// Runtime identifier of an object-graph node.
///
/// Ids are process-unique and never persisted: a deserialized game gets
/// fresh ids, so messages addressed to the nodes of a replaced game find no
/// recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Identity, parent link, dirty flag and publisher of one node.
///
/// The parent is subscribed to the node's `ObjectModified` event when the
/// node is created, so every modification bubbles up one hop per dispatch.
#[derive(Debug)]
pub struct NodeState {
    id: NodeId,
    parent: Option<NodeId>,
    modified: bool,
    publisher: Publisher,
}

impl NodeState {
    #[must_use]
    pub fn new(parent: Option<NodeId>) -> Self {
        let mut publisher = Publisher::new(&NODE_EVENTS);
        if let Some(parent) = parent {
            let subscribed = publisher.subscribe(Event::ObjectModified, SubscriberId::Node(parent));
            debug_assert!(subscribed.is_ok());
        }
        Self {
            id: NodeId::next(),
            parent,
            modified: false,
            publisher,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Own flag only; see [`super::is_modified`] for the recursive query.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn subscribe(&mut self, event: Event, subscriber: SubscriberId) -> Result<(), PubSubError> {
        self.publisher.subscribe(event, subscriber)
    }

    /// Flag this node and notify its subscribers.
    pub fn set_modified(&mut self, queue: &mut MessageQueue) {
        self.mark_modified(None, queue);
    }

    pub(crate) fn mark_modified(&mut self, modified_child: Option<NodeId>, queue: &mut MessageQueue) {
        self.modified = true;
        self.publisher.dispatch(
            Event::ObjectModified,
            Payload::Object {
                object: self.id,
                modified_child,
            },
            queue,
        );
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Announce a freshly attached child and flag this node.
    pub fn announce_child(&mut self, child: NodeId, queue: &mut MessageQueue) {
        self.publisher.dispatch(
            Event::NewChild,
            Payload::Child {
                parent: self.id,
                child,
            },
            queue,
        );
        self.set_modified(queue);
    }
}
