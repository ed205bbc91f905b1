//! Event names, payloads and subscriber addresses.
//!
//! Every publisher declares up front which of these events it may emit.
//! Payloads are cheap to clone: game trees travel behind an `Rc`.

use std::rc::Rc;

use crate::graph::NodeId;
use crate::persist::NodeData;

/// Events published by model objects, models and the game server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A node changed, or one of its descendants did.
    ObjectModified,
    /// A node gained a child (a player joined, a set was created).
    NewChild,
    NewGame,
    NewPlayer,
    /// The server accepted a new canonical state for a game.
    GameUpdated,
    GameLoaded,
    /// A commit was rejected and the last valid snapshot restored.
    GameReverted,
    /// A received committed state replaced the current game.
    GameCommitted,
}

impl Event {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Event::ObjectModified => "object modified",
            Event::NewChild => "new child",
            Event::NewGame => "new game",
            Event::NewPlayer => "new player",
            Event::GameUpdated => "game updated",
            Event::GameLoaded => "game loaded",
            Event::GameReverted => "game reverted",
            Event::GameCommitted => "game committed",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a `Model` (one per client view).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(pub u32);

impl ModelId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model({})", self.0)
    }
}

/// Identifier of a callback registered on the message queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Observer({})", self.0)
    }
}

/// Address a message is delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriberId {
    /// A node of some game's object graph (a parent listening to a child).
    Node(NodeId),
    Model(ModelId),
    /// A callback held by the queue itself.
    Observer(ObserverId),
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriberId::Node(id) => write!(f, "{}", id),
            SubscriberId::Model(id) => write!(f, "{}", id),
            SubscriberId::Observer(id) => write!(f, "{}", id),
        }
    }
}

/// Data carried by a message.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// `object` changed; `modified_child` names the child that caused it
    /// when the change bubbled up.
    Object {
        object: NodeId,
        modified_child: Option<NodeId>,
    },
    Child {
        parent: NodeId,
        child: NodeId,
    },
    /// A full game tree plus its move counter.
    Game {
        game: Rc<NodeData>,
        game_nr: Option<u32>,
        moves: u32,
    },
    Player {
        game_nr: Option<u32>,
        name: String,
    },
}

impl Payload {
    /// Game number carried by a game or player payload.
    #[must_use]
    pub fn game_nr(&self) -> Option<u32> {
        match self {
            Payload::Game { game_nr, .. } | Payload::Player { game_nr, .. } => *game_nr,
            Payload::Object { .. } | Payload::Child { .. } => None,
        }
    }
}

/// An event together with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub event: Event,
    pub payload: Payload,
}

impl Message {
    #[must_use]
    pub fn new(event: Event, payload: Payload) -> Self {
        Self { event, payload }
    }
}

/// A message addressed to one subscriber, waiting in the queue.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub to: SubscriberId,
    pub message: Message,
}
