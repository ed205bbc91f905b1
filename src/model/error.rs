use std::path::PathBuf;

use thiserror::Error;

use crate::game::GameError;
use crate::persist::PersistError;
use crate::pubsub::PubSubError;

/// Errors raised by the game server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("no game number {0} on this server")]
    UnknownGame(u32),

    /// Only games created by a server carry a number.
    #[error("game has no game number")]
    MissingGameNr,

    #[error("save file {} is empty", .0.display())]
    EmptySave(PathBuf),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors raised by a model controller.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model has no current game")]
    NoGame,

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    PubSub(#[from] PubSubError),
}
