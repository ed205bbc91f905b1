use thiserror::Error;

use crate::graph::NodeId;
use crate::persist::PersistError;
use crate::pubsub::PubSubError;

/// Errors raised by game operations.
///
/// Rule violations are not errors: a rejected placement returns `false`.
#[derive(Debug, Error)]
pub enum GameError {
    /// The current-player index is unset or outside the player list.
    #[error("no current player (index {index:?} of {players} players)")]
    NoCurrentPlayer { index: Option<usize>, players: usize },

    #[error("cannot start a game without players")]
    NoPlayers,

    #[error("{0} is not a node of this game")]
    UnknownNode(NodeId),

    #[error(transparent)]
    PubSub(#[from] PubSubError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
