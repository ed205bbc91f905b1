use thiserror::Error;

use super::event::Event;

/// Errors raised by publishers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubSubError {
    /// Subscriptions are only accepted for events the publisher declared.
    #[error("event {event:?} is not declared by this publisher")]
    UndeclaredEvent { event: Event },
}
