//! Publishers: declared events and their subscriber lists.

use smallvec::SmallVec;

use super::error::PubSubError;
use super::event::{Envelope, Event, Message, Payload, SubscriberId};
use super::queue::MessageQueue;

/// Event source with a fixed set of declared events.
///
/// `dispatch` never runs a handler; it enqueues one envelope per subscriber
/// on the queue it is given.
///
/// ## Example
///
/// ```
/// use rummikub_engine::pubsub::{Event, MessageQueue, ModelId, Payload, Publisher, SubscriberId};
///
/// let mut publisher = Publisher::new(&[Event::NewPlayer]);
/// publisher.subscribe(Event::NewPlayer, SubscriberId::Model(ModelId::new(0))).unwrap();
///
/// // Only declared events can be subscribed to
/// assert!(publisher.subscribe(Event::NewGame, SubscriberId::Model(ModelId::new(0))).is_err());
///
/// let mut queue = MessageQueue::new();
/// publisher.dispatch(Event::NewPlayer, Payload::Player { game_nr: None, name: "ann".into() }, &mut queue);
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Publisher {
    declared: SmallVec<[Event; 4]>,
    subscribers: Vec<(Event, SubscriberId)>,
}

impl Publisher {
    #[must_use]
    pub fn new(events: &[Event]) -> Self {
        Self {
            declared: events.iter().copied().collect(),
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn declares(&self, event: Event) -> bool {
        self.declared.contains(&event)
    }

    /// Register `subscriber` for `event`. Registering twice is a no-op.
    pub fn subscribe(&mut self, event: Event, subscriber: SubscriberId) -> Result<(), PubSubError> {
        if !self.declares(event) {
            return Err(PubSubError::UndeclaredEvent { event });
        }
        if !self.subscribers.contains(&(event, subscriber)) {
            self.subscribers.push((event, subscriber));
        }
        Ok(())
    }

    /// Remove every subscription held by `subscriber`.
    pub fn unsubscribe(&mut self, subscriber: SubscriberId) {
        self.subscribers.retain(|(_, s)| *s != subscriber);
    }

    pub fn subscribers(&self, event: Event) -> impl Iterator<Item = SubscriberId> + '_ {
        self.subscribers
            .iter()
            .filter(move |(e, _)| *e == event)
            .map(|(_, s)| *s)
    }

    /// Enqueue `payload` for every subscriber of `event`, in subscription order.
    ///
    /// Returns the number of envelopes enqueued.
    pub fn dispatch(&self, event: Event, payload: Payload, queue: &mut MessageQueue) -> usize {
        debug_assert!(self.declares(event), "dispatch of undeclared event {:?}", event);

        let message = Message::new(event, payload);
        let mut count = 0;
        for to in self.subscribers(event) {
            queue.push(Envelope {
                to,
                message: message.clone(),
            });
            count += 1;
        }
        count
    }
}
