use thiserror::Error;

use crate::core::RegistryError;

/// Errors raised while serializing, deserializing, saving or loading.
#[derive(Debug, Error)]
pub enum PersistError {
    /// An element was applied to a node of a different type.
    #[error("expected a {expected} element, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A known attribute carried a value of the wrong shape.
    #[error("invalid value for {type_tag}.{name}: {reason}")]
    InvalidAttribute {
        type_tag: String,
        name: String,
        reason: String,
    },

    /// The tree decodes, but describes an impossible game (a tile in two
    /// containers, an unknown tile id, a set whose order and membership differ).
    #[error("inconsistent game tree: {0}")]
    Inconsistent(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
