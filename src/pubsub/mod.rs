//! Publish/dispatch.
//!
//! Publishers never call handlers inline. `Publisher::dispatch` enqueues
//! one [`Envelope`] per subscriber on a [`MessageQueue`], and the owner of
//! the queue drains it to exhaustion after each logical action, so every
//! cascading reaction completes in FIFO causal order with no re-entrant
//! handler execution.

pub mod event;
pub mod publisher;
pub mod queue;
mod error;

pub use event::{Envelope, Event, Message, ModelId, ObserverId, Payload, SubscriberId};
pub use publisher::Publisher;
pub use queue::MessageQueue;
pub use error::PubSubError;
