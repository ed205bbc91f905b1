//! # rummikub-engine
//!
//! Rule engine and turn model for Rummikub.
//!
//! ## Design Principles
//!
//! 1. **Tiles live in one registry**: containers refer to tiles by id and
//!    each tile records the container that holds it. Moving a tile never
//!    re-parents an object.
//!
//! 2. **Turns are transactions**: tiles placed during a turn remember the
//!    plate they came from. An invalid arrangement is pulled back to the
//!    plates, and an invalid commit restores the last valid snapshot.
//!
//! 3. **One tree format**: the same serialized tree is the save file, the
//!    network payload and the cloning mechanism.
//!
//! ## Architecture
//!
//! - **Queued dispatch**: publishers enqueue; the session that owns the
//!   queue drains it to exhaustion after each action, in FIFO order.
//!
//! - **Server-authoritative sync**: clients act on private clones and push
//!   whole games; followers accept an update only if it carries more moves.
//!
//! ## Modules
//!
//! - `core`: Tiles, the tile registry, players, RNG, configuration
//! - `rules`: Set-type inference, joker resolution, fit positions
//! - `graph`: Node identity, dirty tracking and its bubbling
//! - `persist`: Tree format and the generic serializer
//! - `containers`: Pile, plates, board and sets
//! - `game`: The game aggregate and turn state machine
//! - `pubsub`: Events, publishers and the message queue
//! - `model`: Offline model, game server, synchronizing clients, sessions

pub mod core;
pub mod rules;
pub mod graph;
pub mod persist;
pub mod containers;
pub mod game;
pub mod pubsub;
pub mod model;

// Re-export commonly used types
pub use crate::core::{
    Color, Tile, TileId, TileKind, TileRegistry, RegistryError,
    PlayerId, GameRng, GameRngState, GameConfig,
};

pub use crate::rules::{SetType, Face, set_type, fit_position, is_valid_set};

pub use crate::graph::{ModelObject, NodeId, NodeState};

pub use crate::persist::{NodeData, Persistent, PersistError};

pub use crate::containers::{
    Container, ContainerRef, TileContainer,
    TileSet, BoardPos, Board, Pile, Plate,
};

pub use crate::game::{Game, Player, GameError};

pub use crate::pubsub::{
    Event, Payload, Message, Envelope,
    Publisher, SubscriberId, ModelId, MessageQueue, PubSubError,
};

pub use crate::model::{
    Model, CommitOutcome, GameServer, SynchronizingModel,
    LocalSession, Session, ModelError, ServerError,
};
