//! Harnesses that own the message queue and drain it after every action.
//!
//! [`LocalSession`] drives a single offline [`Model`]. [`Session`] wires a
//! [`GameServer`] to any number of [`SynchronizingModel`] clients over one
//! shared queue, the way an in-process network would.

use std::path::Path;

use crate::containers::ContainerRef;
use crate::core::{GameConfig, PlayerId, TileId};
use crate::graph::NodeId;
use crate::persist::NodeData;
use crate::pubsub::{Envelope, Event, Message, MessageQueue, ModelId, ObserverId, SubscriberId};

use super::error::{ModelError, ServerError};
use super::model::{CommitOutcome, Model};
use super::server::GameServer;
use super::sync::SynchronizingModel;

/// One offline model and its queue.
#[derive(Debug)]
pub struct LocalSession {
    queue: MessageQueue,
    model: Model,
}

impl LocalSession {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            queue: MessageQueue::new(),
            model: Model::new(ModelId::new(0), config),
        }
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    /// Deliver everything pending. Returns the number of envelopes.
    pub fn flush(&mut self) -> usize {
        let Self { queue, model } = self;
        queue.drain(|envelope, queue| match envelope.to {
            SubscriberId::Node(to) => {
                if !model.route(to, &envelope.message, queue) {
                    log::debug!("dropping {} for detached {}", envelope.message.event, to);
                }
            }
            other => log::debug!("no handler for {} addressed to {}", envelope.message.event, other),
        })
    }

    /// Call `callback` for every `event` the model publishes.
    pub fn observe(&mut self, event: Event, callback: impl FnMut(&Message) + 'static) -> Result<ObserverId, ModelError> {
        let id = self.queue.observe(callback);
        self.model.subscribe(event, SubscriberId::Observer(id))?;
        Ok(id)
    }

    /// Call `callback` for every `event` node `node` of the current game
    /// publishes.
    pub fn observe_node(
        &mut self,
        node: NodeId,
        event: Event,
        callback: impl FnMut(&Message) + 'static,
    ) -> Result<ObserverId, ModelError> {
        let game = self.model.game_mut().ok_or(ModelError::NoGame)?;
        let id = self.queue.observe(callback);
        game.subscribe(node, event, SubscriberId::Observer(id))?;
        Ok(id)
    }

    pub fn new_game(&mut self, max_players: usize) {
        self.model.new_game(max_players, &mut self.queue);
        self.flush();
    }

    pub fn add_player(&mut self, name: &str) -> Result<Option<PlayerId>, ModelError> {
        let added = self.model.add_player(name, &mut self.queue);
        self.flush();
        added
    }

    pub fn start(&mut self) -> Result<(), ModelError> {
        let started = self.model.start(&mut self.queue);
        self.flush();
        started
    }

    pub fn move_tile(&mut self, tile: TileId, target: ContainerRef, pos: Option<usize>) -> Result<bool, ModelError> {
        let moved = self.model.move_tile(tile, target, pos, &mut self.queue);
        self.flush();
        moved
    }

    pub fn pick(&mut self) -> Result<Option<TileId>, ModelError> {
        let drawn = self.model.pick(&mut self.queue);
        self.flush();
        drawn
    }

    pub fn commit(&mut self) -> Result<CommitOutcome, ModelError> {
        let outcome = self.model.commit_moves(&mut self.queue);
        self.flush();
        outcome
    }

    pub fn revert(&mut self) -> Result<bool, ModelError> {
        let reverted = self.model.revert_game(&mut self.queue);
        self.flush();
        reverted
    }

    pub fn load_game(&mut self, data: &NodeData) -> Result<(), ModelError> {
        let loaded = self.model.load_game(data, &mut self.queue);
        self.flush();
        loaded
    }
}

/// A server, its clients and the queue between them.
#[derive(Debug)]
pub struct Session {
    queue: MessageQueue,
    server: GameServer,
    clients: Vec<SynchronizingModel>,
}

impl Session {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            queue: MessageQueue::new(),
            server: GameServer::new(config),
            clients: Vec::new(),
        }
    }

    #[must_use]
    pub fn server(&self) -> &GameServer {
        &self.server
    }

    #[must_use]
    pub fn client(&self, id: ModelId) -> Option<&SynchronizingModel> {
        self.clients.get(id.index())
    }

    #[must_use]
    pub fn clients(&self) -> &[SynchronizingModel] {
        &self.clients
    }

    /// Deliver everything pending. Returns the number of envelopes.
    pub fn flush(&mut self) -> usize {
        let Self { queue, server, clients } = self;
        queue.drain(|envelope, queue| Self::deliver(server, clients, envelope, queue))
    }

    fn deliver(
        server: &mut GameServer,
        clients: &mut [SynchronizingModel],
        envelope: Envelope,
        queue: &mut MessageQueue,
    ) {
        match envelope.to {
            SubscriberId::Node(to) => {
                let routed = server.route_node(to, &envelope.message, queue)
                    || clients
                        .iter_mut()
                        .any(|c| c.model_mut().route(to, &envelope.message, queue));
                if !routed {
                    log::debug!("dropping {} for detached {}", envelope.message.event, to);
                }
            }
            SubscriberId::Model(id) => match clients.get_mut(id.index()) {
                Some(client) => {
                    if let Err(err) = client.on_message(&envelope.message, queue) {
                        log::warn!("{} failed to apply {}: {}", id, envelope.message.event, err);
                    }
                }
                None => log::debug!("dropping {} for unknown {}", envelope.message.event, id),
            },
            SubscriberId::Observer(_) => {}
        }
    }

    /// Call `callback` for every `event` the server publishes.
    pub fn observe(&mut self, event: Event, callback: impl FnMut(&Message) + 'static) -> Result<ObserverId, ModelError> {
        let id = self.queue.observe(callback);
        self.server.subscribe(event, SubscriberId::Observer(id))?;
        Ok(id)
    }

    pub fn new_game(&mut self, max_players: usize) -> u32 {
        let nr = self.server.new_game(max_players, &mut self.queue);
        self.flush();
        nr
    }

    pub fn add_player(&mut self, game_nr: u32, name: &str) -> Result<Option<PlayerId>, ServerError> {
        let added = self.server.add_player(game_nr, name, &mut self.queue);
        self.flush();
        added
    }

    pub fn start_game(&mut self, game_nr: u32) -> Result<(), ServerError> {
        let started = self.server.start_game(game_nr, &mut self.queue);
        self.flush();
        started
    }

    /// Connect a new client to game `game_nr`.
    pub fn join(&mut self, game_nr: u32) -> Result<ModelId, ModelError> {
        let id = ModelId::new(self.clients.len() as u32);
        let client = SynchronizingModel::join(id, &mut self.server, game_nr)?;
        self.clients.push(client);
        Ok(id)
    }

    pub fn move_tile(
        &mut self,
        client: ModelId,
        tile: TileId,
        target: ContainerRef,
        pos: Option<usize>,
    ) -> Result<bool, ModelError> {
        let moved = {
            let Self { queue, clients, .. } = self;
            match clients.get_mut(client.index()) {
                Some(c) => c.move_tile(tile, target, pos, queue),
                None => Err(ModelError::NoGame),
            }
        };
        self.flush();
        moved
    }

    pub fn pick(&mut self, client: ModelId) -> Result<Option<TileId>, ModelError> {
        let drawn = {
            let Self { queue, server, clients } = self;
            match clients.get_mut(client.index()) {
                Some(c) => c.pick(server, queue),
                None => Err(ModelError::NoGame),
            }
        };
        self.flush();
        drawn
    }

    pub fn commit(&mut self, client: ModelId) -> Result<CommitOutcome, ModelError> {
        let outcome = {
            let Self { queue, server, clients } = self;
            match clients.get_mut(client.index()) {
                Some(c) => c.commit_moves(server, queue),
                None => Err(ModelError::NoGame),
            }
        };
        self.flush();
        outcome
    }

    pub fn add_player_via(&mut self, client: ModelId, name: &str) -> Result<Option<PlayerId>, ModelError> {
        let added = {
            let Self { queue, server, clients } = self;
            match clients.get_mut(client.index()) {
                Some(c) => c.add_player(name, server, queue),
                None => Err(ModelError::NoGame),
            }
        };
        self.flush();
        added
    }

    pub fn save_game(&self, game_nr: u32, path: impl AsRef<Path>) -> Result<(), ServerError> {
        self.server.save_game(game_nr, path)
    }

    pub fn load_game(&mut self, path: impl AsRef<Path>) -> Result<u32, ServerError> {
        let loaded = self.server.load_game(path, &mut self.queue);
        self.flush();
        loaded
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::containers::Container;

    #[test]
    fn test_local_session_observes_model_events() {
        let mut session = LocalSession::new(GameConfig::new().seed(8));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session
            .observe(Event::GameReverted, move |m| sink.borrow_mut().push(m.event))
            .unwrap();

        session.new_game(2);
        session.add_player("ann").unwrap();
        session.add_player("bob").unwrap();
        session.start().unwrap();

        let tile = session.model().game().unwrap().players()[0].plate().membership().ids()[0];
        assert!(session.move_tile(tile, ContainerRef::Board, None).unwrap());
        assert_eq!(session.commit().unwrap(), CommitOutcome::Reverted);
        assert_eq!(*seen.borrow(), vec![Event::GameReverted]);
        assert!(session.queue().is_empty());
    }

    #[test]
    fn test_node_events_bubble_to_root() {
        let mut session = LocalSession::new(GameConfig::new().seed(8));
        session.new_game(2);
        session.add_player("ann").unwrap();
        session.start().unwrap();

        let root = {
            use crate::graph::ModelObject;
            session.model().game().unwrap().id()
        };
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        session
            .observe_node(root, Event::ObjectModified, move |_| *sink.borrow_mut() += 1)
            .unwrap();

        let tile = session.model().game().unwrap().players()[0].plate().membership().ids()[0];
        session.move_tile(tile, ContainerRef::Board, None).unwrap();
        assert!(*count.borrow() > 0);
        assert!(session.model().is_game_modified());
    }

    #[test]
    fn test_session_unknown_client() {
        let mut session = Session::new(GameConfig::new().seed(1));
        assert!(matches!(session.pick(ModelId::new(3)), Err(ModelError::NoGame)));
        assert!(matches!(session.join(7), Err(ModelError::Server(ServerError::UnknownGame(7)))));
    }
}
