//! Controllers above the game: the offline model with snapshot/revert,
//! the authoritative server, synchronizing clients and the session
//! harnesses that drain the message queue after every action.

#[allow(clippy::module_inception)]
pub mod model;
pub mod server;
pub mod sync;
pub mod session;
mod error;

pub use model::{CommitOutcome, Model, MODEL_EVENTS};
pub use server::{GameServer, SERVER_EVENTS};
pub use sync::SynchronizingModel;
pub use session::{LocalSession, Session};
pub use error::{ModelError, ServerError};
