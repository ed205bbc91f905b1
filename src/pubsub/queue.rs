//! The FIFO message queue.
//!
//! Mutations enqueue envelopes; whoever owns the queue drains it after each
//! logical action. A drain runs until the queue is empty, including
//! envelopes enqueued by the handlers it calls. A drain started from inside
//! a handler is a no-op: the outer drain picks the new envelopes up.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::event::{Envelope, Message, ObserverId, SubscriberId};

type Observer = Box<dyn FnMut(&Message)>;

/// Process-wide FIFO of pending envelopes plus the observer callbacks that
/// `Observer` addresses resolve to.
#[derive(Default)]
pub struct MessageQueue {
    pending: VecDeque<Envelope>,
    observers: FxHashMap<ObserverId, Observer>,
    next_observer: u32,
    draining: bool,
    delivered: usize,
}

impl std::fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageQueue")
            .field("pending", &self.pending.len())
            .field("observers", &self.observers.len())
            .field("draining", &self.draining)
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl MessageQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, envelope: Envelope) {
        log::trace!("enqueue {} -> {}", envelope.message.event, envelope.to);
        self.pending.push_back(envelope);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total envelopes delivered over the queue's lifetime.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Register a callback. Subscribe the returned id to a publisher to
    /// receive its messages.
    pub fn observe(&mut self, callback: impl FnMut(&Message) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, Box::new(callback));
        id
    }

    pub fn forget(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Deliver every pending envelope in FIFO order.
    ///
    /// Observer envelopes are handled here; all others are passed to
    /// `deliver` together with the queue, so handlers can enqueue follow-up
    /// messages. Returns the number of envelopes delivered by this call.
    pub fn drain(&mut self, mut deliver: impl FnMut(Envelope, &mut MessageQueue)) -> usize {
        if self.draining {
            return 0;
        }
        self.draining = true;

        let mut count = 0;
        while let Some(envelope) = self.pending.pop_front() {
            count += 1;
            match envelope.to {
                SubscriberId::Observer(id) => match self.observers.get_mut(&id) {
                    Some(callback) => callback(&envelope.message),
                    None => log::debug!("dropping {} for forgotten {}", envelope.message.event, id),
                },
                _ => deliver(envelope, self),
            }
        }

        self.draining = false;
        self.delivered += count;
        count
    }
}
