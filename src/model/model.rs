//! The offline controller: one current game plus its last valid snapshot.

use std::rc::Rc;

use crate::containers::ContainerRef;
use crate::core::{GameConfig, PlayerId, TileId};
use crate::game::{Game, Player};
use crate::graph::NodeId;
use crate::persist::NodeData;
use crate::pubsub::{Event, Message, MessageQueue, ModelId, Payload, PubSubError, Publisher, SubscriberId};

use super::error::ModelError;

/// Events a [`Model`] publishes.
pub const MODEL_EVENTS: [Event; 5] = [
    Event::NewGame,
    Event::NewPlayer,
    Event::GameLoaded,
    Event::GameReverted,
    Event::GameCommitted,
];

/// How a commit attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The board was valid; the turn advanced.
    Committed,
    /// The board was invalid; the last valid snapshot was restored.
    Reverted,
    /// The board was invalid and there was no snapshot to restore.
    Rejected,
}

/// Full-state payload for a game.
pub(crate) fn game_payload(game: &Game) -> Payload {
    Payload::Game {
        game: Rc::new(game.serialize()),
        game_nr: game.game_nr(),
        moves: game.moves(),
    }
}

/// Controller for one client's view of a game.
///
/// Every successful turn leaves a serialized snapshot behind; a commit of
/// an invalid board throws the whole current game away and rebuilds it
/// from that snapshot.
#[derive(Debug)]
pub struct Model {
    id: ModelId,
    config: GameConfig,
    current: Option<Game>,
    last_valid_state: Option<NodeData>,
    publisher: Publisher,
}

impl Model {
    #[must_use]
    pub fn new(id: ModelId, config: GameConfig) -> Self {
        Self {
            id,
            config,
            current: None,
            last_valid_state: None,
            publisher: Publisher::new(&MODEL_EVENTS),
        }
    }

    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.current.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.current.as_mut()
    }

    fn current_mut(&mut self) -> Result<&mut Game, ModelError> {
        self.current.as_mut().ok_or(ModelError::NoGame)
    }

    #[must_use]
    pub fn last_valid_state(&self) -> Option<&NodeData> {
        self.last_valid_state.as_ref()
    }

    pub fn subscribe(&mut self, event: Event, subscriber: SubscriberId) -> Result<(), PubSubError> {
        self.publisher.subscribe(event, subscriber)
    }

    pub fn unsubscribe(&mut self, subscriber: SubscriberId) {
        self.publisher.unsubscribe(subscriber);
    }

    /// Snapshot the current game as the last valid state.
    pub fn remember_state(&mut self) -> Result<(), ModelError> {
        let snapshot = self.current.as_ref().ok_or(ModelError::NoGame)?.serialize();
        log::trace!("{} remembers state at move {:?}", self.id, snapshot.attribute("moves"));
        self.last_valid_state = Some(snapshot);
        Ok(())
    }

    /// Discard any current game and start over with an empty one.
    pub fn new_game(&mut self, max_players: usize, queue: &mut MessageQueue) -> &Game {
        let config = self.config.clone().max_players(max_players);
        let game = Game::new(&config);
        log::info!("{} created a new game for {} players", self.id, max_players);
        self.publisher.dispatch(Event::NewGame, game_payload(&game), queue);
        self.last_valid_state = None;
        self.current.insert(game)
    }

    /// Replace the current game without publishing. Used by clients that
    /// take their game from a server.
    pub fn replace_game(&mut self, game: Game) {
        self.current = Some(game);
    }

    pub fn start(&mut self, queue: &mut MessageQueue) -> Result<(), ModelError> {
        self.current_mut()?.start(queue)?;
        self.remember_state()
    }

    /// End the current player's turn by drawing.
    pub fn pick(&mut self, queue: &mut MessageQueue) -> Result<Option<TileId>, ModelError> {
        let drawn = self.current_mut()?.pick_tile(queue)?;
        self.remember_state()?;
        Ok(drawn)
    }

    pub fn move_tile(
        &mut self,
        tile: TileId,
        target: ContainerRef,
        pos: Option<usize>,
        queue: &mut MessageQueue,
    ) -> Result<bool, ModelError> {
        Ok(self.current_mut()?.move_tile(tile, target, pos, queue))
    }

    /// Commit the turn if the board is valid, otherwise revert.
    pub fn commit_moves(&mut self, queue: &mut MessageQueue) -> Result<CommitOutcome, ModelError> {
        let game = self.current_mut()?;
        if !game.validate() {
            log::info!(
                "{} invalid sets on the board, reverting to last valid state",
                game.invalid_sets()
            );
            return Ok(if self.revert_game(queue)? {
                CommitOutcome::Reverted
            } else {
                CommitOutcome::Rejected
            });
        }
        game.commit(queue);
        self.remember_state()?;
        Ok(CommitOutcome::Committed)
    }

    /// Rebuild the current game from the last valid snapshot.
    ///
    /// Returns `false` when there is no snapshot yet.
    pub fn revert_game(&mut self, queue: &mut MessageQueue) -> Result<bool, ModelError> {
        let Some(snapshot) = self.last_valid_state.as_ref() else {
            log::warn!("{} has no valid state to revert to", self.id);
            return Ok(false);
        };
        let game = Game::from_tree(snapshot)?;
        log::info!("{} reverted game {:?} to move {}", self.id, game.game_nr(), game.moves());
        self.publisher.dispatch(Event::GameReverted, game_payload(&game), queue);
        self.current = Some(game);
        Ok(true)
    }

    /// Take a committed state received from elsewhere as the current game
    /// and as the last valid state.
    pub fn commit_game(&mut self, data: &NodeData, queue: &mut MessageQueue) -> Result<(), ModelError> {
        let game = Game::from_tree(data)?;
        self.publisher.dispatch(Event::GameCommitted, game_payload(&game), queue);
        self.current = Some(game);
        self.last_valid_state = Some(data.clone());
        Ok(())
    }

    /// Replace the current game with a loaded state.
    pub fn load_game(&mut self, data: &NodeData, queue: &mut MessageQueue) -> Result<(), ModelError> {
        let game = Game::from_tree(data)?;
        log::info!("{} loaded game {:?} at move {}", self.id, game.game_nr(), game.moves());
        self.publisher.dispatch(Event::GameLoaded, game_payload(&game), queue);
        self.current = Some(game);
        self.last_valid_state = Some(data.clone());
        Ok(())
    }

    pub fn add_player(&mut self, name: &str, queue: &mut MessageQueue) -> Result<Option<PlayerId>, ModelError> {
        let game = self.current_mut()?;
        let added = game.add_player_by_name(name, queue);
        if added.is_some() {
            let payload = Payload::Player {
                game_nr: game.game_nr(),
                name: name.to_string(),
            };
            self.publisher.dispatch(Event::NewPlayer, payload, queue);
        }
        Ok(added)
    }

    pub fn current_player(&self) -> Result<&Player, ModelError> {
        let game = self.current.as_ref().ok_or(ModelError::NoGame)?;
        Ok(game.current_player()?)
    }

    #[must_use]
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.current.as_ref()?.player_by_name(name)
    }

    #[must_use]
    pub fn is_game_modified(&self) -> bool {
        self.current.as_ref().map_or(false, |g| g.is_modified(true))
    }

    /// Deliver a node message if the current game owns the node.
    pub fn route(&mut self, to: NodeId, message: &Message, queue: &mut MessageQueue) -> bool {
        match self.current.as_mut() {
            Some(game) if game.owns_node(to) => game.handle(to, message, queue).is_ok(),
            _ => false,
        }
    }
}
