//! The authoritative game server.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::core::{GameConfig, PlayerId};
use crate::game::Game;
use crate::graph::NodeId;
use crate::persist::{NodeData, PersistError};
use crate::pubsub::{Event, Message, MessageQueue, Payload, PubSubError, Publisher, SubscriberId};

use super::error::ServerError;
use super::model::game_payload;

/// Events a [`GameServer`] publishes.
pub const SERVER_EVENTS: [Event; 3] = [Event::NewGame, Event::GameUpdated, Event::NewPlayer];

/// Holds the canonical copy of every game, keyed by game number.
///
/// Callers only ever see clones. Updates overwrite the canonical copy
/// wholesale and are broadcast with the new move counter.
#[derive(Debug)]
pub struct GameServer {
    games: FxHashMap<u32, Game>,
    next_game_nr: u32,
    publisher: Publisher,
    config: GameConfig,
}

impl GameServer {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            games: FxHashMap::default(),
            next_game_nr: 1,
            publisher: Publisher::new(&SERVER_EVENTS),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn subscribe(&mut self, event: Event, subscriber: SubscriberId) -> Result<(), PubSubError> {
        self.publisher.subscribe(event, subscriber)
    }

    pub fn unsubscribe(&mut self, subscriber: SubscriberId) {
        self.publisher.unsubscribe(subscriber);
    }

    /// Game numbers currently held, ascending.
    #[must_use]
    pub fn game_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.games.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    fn canonical(&self, nr: u32) -> Result<&Game, ServerError> {
        self.games.get(&nr).ok_or(ServerError::UnknownGame(nr))
    }

    /// Create a game and assign it the next game number.
    pub fn new_game(&mut self, max_players: usize, queue: &mut MessageQueue) -> u32 {
        let nr = self.next_game_nr;
        self.next_game_nr += 1;

        let mut game = Game::new(&self.config.clone().max_players(max_players));
        game.set_game_nr(nr);
        log::info!("server created game {} for {} players", nr, max_players);
        self.publisher.dispatch(Event::NewGame, game_payload(&game), queue);
        self.games.insert(nr, game);
        nr
    }

    /// An independent copy of game `nr`.
    pub fn get_game(&self, nr: u32) -> Result<Game, ServerError> {
        Ok(self.canonical(nr)?.clone_game()?)
    }

    /// Add a named player to game `nr` and publish the new state.
    pub fn add_player(&mut self, nr: u32, name: &str, queue: &mut MessageQueue) -> Result<Option<PlayerId>, ServerError> {
        let mut game = self.get_game(nr)?;
        let added = game.add_player_by_name(name, queue);
        if added.is_some() {
            self.publisher.dispatch(
                Event::NewPlayer,
                Payload::Player {
                    game_nr: Some(nr),
                    name: name.to_string(),
                },
                queue,
            );
        }
        self.update_game(&game, queue)?;
        Ok(added)
    }

    /// Overwrite the canonical copy with `game` and broadcast it.
    pub fn update_game(&mut self, game: &Game, queue: &mut MessageQueue) -> Result<(), ServerError> {
        let nr = game.game_nr().ok_or(ServerError::MissingGameNr)?;
        let canonical = game.clone_game()?;
        log::info!("server updated game {} at move {}", nr, canonical.moves());
        self.publisher.dispatch(Event::GameUpdated, game_payload(&canonical), queue);
        self.games.insert(nr, canonical);
        self.next_game_nr = self.next_game_nr.max(nr + 1);
        Ok(())
    }

    /// Deal hands in game `nr` and broadcast the dealt state.
    pub fn start_game(&mut self, nr: u32, queue: &mut MessageQueue) -> Result<(), ServerError> {
        let game = self.games.get_mut(&nr).ok_or(ServerError::UnknownGame(nr))?;
        game.start(queue)?;
        self.publisher.dispatch(Event::GameUpdated, game_payload(game), queue);
        Ok(())
    }

    /// Write game `nr` to `path` as a single line of JSON.
    pub fn save_game(&self, nr: u32, path: impl AsRef<Path>) -> Result<(), ServerError> {
        let text = self.canonical(nr)?.to_json()?;
        fs::write(path.as_ref(), text).map_err(PersistError::from)?;
        log::info!("game {} saved to {}", nr, path.as_ref().display());
        Ok(())
    }

    /// Read a saved game from the first line of `path` and publish it as
    /// an update. Returns its game number; a save without one gets the
    /// next free number.
    pub fn load_game(&mut self, path: impl AsRef<Path>, queue: &mut MessageQueue) -> Result<u32, ServerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(PersistError::from)?;
        let line = text.lines().next().unwrap_or_default().trim();
        if line.is_empty() {
            log::warn!("save file {} is empty", path.display());
            return Err(ServerError::EmptySave(path.to_path_buf()));
        }

        let mut game = Game::from_tree(&NodeData::from_json(line)?)?;
        let nr = match game.game_nr() {
            Some(nr) => nr,
            None => {
                let nr = self.next_game_nr;
                game.set_game_nr(nr);
                nr
            }
        };
        log::info!("game {} loaded from {}", nr, path.display());
        self.update_game(&game, queue)?;
        Ok(nr)
    }

    /// Deliver a node message to whichever canonical game owns the node.
    pub fn route_node(&mut self, to: NodeId, message: &Message, queue: &mut MessageQueue) -> bool {
        self.games
            .values_mut()
            .find(|g| g.owns_node(to))
            .map_or(false, |g| g.handle(to, message, queue).is_ok())
    }
}
