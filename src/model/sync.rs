//! Client-side model that mirrors one game held by a [`GameServer`].

use crate::containers::ContainerRef;
use crate::core::{PlayerId, TileId};
use crate::game::Game;
use crate::pubsub::{Event, Message, MessageQueue, ModelId, Payload, SubscriberId};

use super::error::ModelError;
use super::model::{CommitOutcome, Model};
use super::server::GameServer;

/// A [`Model`] whose turn-ending actions are pushed to a server, and which
/// follows updates pushed by other clients.
///
/// Convergence is last-writer-wins on the move counter: an incoming
/// update replaces the local game only if it carries strictly more moves.
#[derive(Debug)]
pub struct SynchronizingModel {
    model: Model,
    game_nr: u32,
}

impl SynchronizingModel {
    /// Take a copy of game `game_nr` and follow its updates.
    pub fn join(id: ModelId, server: &mut GameServer, game_nr: u32) -> Result<Self, ModelError> {
        let game = server.get_game(game_nr)?;
        server.subscribe(Event::NewGame, SubscriberId::Model(id))?;
        server.subscribe(Event::GameUpdated, SubscriberId::Model(id))?;

        let mut model = Model::new(id, server.config().clone());
        model.replace_game(game);
        model.remember_state()?;
        log::info!("{} joined game {}", id, game_nr);
        Ok(Self { model, game_nr })
    }

    #[must_use]
    pub fn id(&self) -> ModelId {
        self.model.id()
    }

    #[must_use]
    pub fn game_nr(&self) -> u32 {
        self.game_nr
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.model.game()
    }

    fn push(&self, server: &mut GameServer, queue: &mut MessageQueue) -> Result<(), ModelError> {
        let game = self.model.game().ok_or(ModelError::NoGame)?;
        server.update_game(game, queue)?;
        Ok(())
    }

    /// Local placement; nothing is sent until the turn ends.
    pub fn move_tile(
        &mut self,
        tile: TileId,
        target: ContainerRef,
        pos: Option<usize>,
        queue: &mut MessageQueue,
    ) -> Result<bool, ModelError> {
        self.model.move_tile(tile, target, pos, queue)
    }

    pub fn pick(&mut self, server: &mut GameServer, queue: &mut MessageQueue) -> Result<Option<TileId>, ModelError> {
        let drawn = self.model.pick(queue)?;
        self.push(server, queue)?;
        Ok(drawn)
    }

    pub fn commit_moves(&mut self, server: &mut GameServer, queue: &mut MessageQueue) -> Result<CommitOutcome, ModelError> {
        let outcome = self.model.commit_moves(queue)?;
        self.push(server, queue)?;
        Ok(outcome)
    }

    pub fn add_player(
        &mut self,
        name: &str,
        server: &mut GameServer,
        queue: &mut MessageQueue,
    ) -> Result<Option<PlayerId>, ModelError> {
        let added = self.model.add_player(name, queue)?;
        self.push(server, queue)?;
        Ok(added)
    }

    /// Handle a server broadcast. Returns whether the local game was
    /// replaced.
    pub fn on_message(&mut self, message: &Message, queue: &mut MessageQueue) -> Result<bool, ModelError> {
        if message.payload.game_nr() != Some(self.game_nr) {
            return Ok(false);
        }
        let Payload::Game { game, moves, .. } = &message.payload else {
            return Ok(false);
        };
        match message.event {
            Event::NewGame => {
                self.model.load_game(game, queue)?;
                Ok(true)
            }
            Event::GameUpdated => {
                let local = self.model.game().map_or(0, Game::moves);
                if local < *moves {
                    log::debug!("{} follows game {} from move {} to {}", self.id(), self.game_nr, local, moves);
                    self.model.load_game(game, queue)?;
                    Ok(true)
                } else {
                    log::debug!("{} ignores stale update at move {} (local {})", self.id(), moves, local);
                    Ok(false)
                }
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::GameConfig;

    fn server_with_game(queue: &mut MessageQueue) -> (GameServer, u32) {
        let mut server = GameServer::new(GameConfig::new().seed(5));
        let nr = server.new_game(2, queue);
        server.add_player(nr, "ann", queue).unwrap();
        server.add_player(nr, "bob", queue).unwrap();
        server.start_game(nr, queue).unwrap();
        (server, nr)
    }

    #[test]
    fn test_join_copies_server_state() {
        let mut queue = MessageQueue::new();
        let (mut server, nr) = server_with_game(&mut queue);
        let client = SynchronizingModel::join(ModelId::new(0), &mut server, nr).unwrap();

        assert_eq!(client.game_nr(), nr);
        assert_eq!(
            client.game().unwrap().serialize(),
            server.get_game(nr).unwrap().serialize()
        );
        assert!(client.model().last_valid_state().is_some());
    }

    #[test]
    fn test_pick_pushes_to_server() {
        let mut queue = MessageQueue::new();
        let (mut server, nr) = server_with_game(&mut queue);
        let mut client = SynchronizingModel::join(ModelId::new(0), &mut server, nr).unwrap();

        client.pick(&mut server, &mut queue).unwrap();
        assert_eq!(server.get_game(nr).unwrap().moves(), 1);
    }

    #[test]
    fn test_other_game_numbers_ignored() {
        let mut queue = MessageQueue::new();
        let (mut server, nr) = server_with_game(&mut queue);
        let mut client = SynchronizingModel::join(ModelId::new(0), &mut server, nr).unwrap();

        let mut other = server.get_game(nr).unwrap();
        other.set_game_nr(nr + 1);
        other.pick_tile(&mut queue).unwrap();
        let message = Message::new(
            Event::GameUpdated,
            Payload::Game {
                game: Rc::new(other.serialize()),
                game_nr: Some(nr + 1),
                moves: other.moves(),
            },
        );
        assert!(!client.on_message(&message, &mut queue).unwrap());
        assert_eq!(client.game().unwrap().moves(), 0);
    }
}
