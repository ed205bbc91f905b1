//! The game aggregate and its turn state machine.
//!
//! ## Turn flow
//!
//! ```text
//! NotStarted --start--> PlayerTurnActive --pick_tile--> next player's turn
//!                              |
//!                              +--commit--> next player's turn
//! ```
//!
//! During a turn the acting player moves tiles freely between their plate
//! and the board. Tiles that leave a plate remember it, so
//! [`Game::clean_up`] can send them back when their set does not hold up.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::containers::{Board, BoardPos, Container, ContainerRef, Pile};
use crate::core::{GameConfig, GameRng, GameRngState, PlayerId, Tile, TileId, TileRegistry};
use crate::graph::{self, ModelObject, NodeId, NodeState};
use crate::persist::{self, Assignment, NodeData, PersistError, Persistent};
use crate::pubsub::{Event, Message, MessageQueue, SubscriberId};

use super::error::GameError;
use super::player::Player;

/// One game: players, board, pile and the tiles they hold.
///
/// Publishing operations take the message queue they enqueue on; the
/// caller drains it.
///
/// ## Example
///
/// ```
/// use rummikub_engine::containers::Container;
/// use rummikub_engine::core::GameConfig;
/// use rummikub_engine::game::Game;
/// use rummikub_engine::pubsub::MessageQueue;
///
/// let mut queue = MessageQueue::new();
/// let mut game = Game::new(&GameConfig::new().seed(7));
/// game.add_player_by_name("ann", &mut queue);
/// game.add_player_by_name("bob", &mut queue);
/// game.start(&mut queue).unwrap();
///
/// assert_eq!(game.current_player().unwrap().name(), Some("ann"));
/// assert_eq!(game.pile().size(), 106 - 28);
///
/// game.pick_tile(&mut queue).unwrap();
/// assert_eq!(game.current_player().unwrap().name(), Some("bob"));
/// ```
#[derive(Debug)]
pub struct Game {
    node: NodeState,
    max_players: usize,
    hand_size: usize,
    players: Vec<Player>,
    board: Board,
    pile: Pile,
    tiles: TileRegistry,
    rng: GameRng,
    current_player_nr: Option<usize>,
    game_nr: Option<u32>,
    moves: u32,
}

impl Game {
    /// A fresh game with a full pile and no players.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let node = NodeState::new(None);
        let board = Board::new(node.id());
        let mut pile = Pile::new(node.id());
        let mut tiles = TileRegistry::new();
        if let Err(err) = pile.fill(&mut tiles) {
            log::error!("pile construction failed: {}", err);
        }

        Self {
            node,
            max_players: config.max_players,
            hand_size: config.hand_size,
            players: Vec::new(),
            board,
            pile,
            tiles,
            rng: GameRng::new(config.seed),
            current_player_nr: None,
            game_nr: None,
            moves: 0,
        }
    }

    #[must_use]
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == Some(name))
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    #[must_use]
    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Incremented once per finished turn.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn game_nr(&self) -> Option<u32> {
        self.game_nr
    }

    pub fn set_game_nr(&mut self, nr: u32) {
        self.game_nr = Some(nr);
    }

    #[must_use]
    pub fn current_player_nr(&self) -> Option<usize> {
        self.current_player_nr
    }

    /// The player whose turn it is.
    ///
    /// Before `start`, or with an index outside the player list, there is
    /// none; that is an invariant violation once the game is running.
    pub fn current_player(&self) -> Result<&Player, GameError> {
        match self.current_player_nr.and_then(|nr| self.players.get(nr)) {
            Some(player) => Ok(player),
            None => {
                log::error!(
                    "no current player: index {:?} of {} players",
                    self.current_player_nr,
                    self.players.len()
                );
                Err(GameError::NoCurrentPlayer {
                    index: self.current_player_nr,
                    players: self.players.len(),
                })
            }
        }
    }

    #[must_use]
    pub fn is_player_turn(&self, player: PlayerId) -> bool {
        player.index() < self.players.len() && self.current_player_nr == Some(player.index())
    }

    /// Add an anonymous player. `None` when the game is full.
    pub fn add_player(&mut self, queue: &mut MessageQueue) -> Option<PlayerId> {
        self.push_player(None, queue)
    }

    /// Add a named player. `None` when the name is taken or the game is full.
    pub fn add_player_by_name(&mut self, name: &str, queue: &mut MessageQueue) -> Option<PlayerId> {
        if self.player_by_name(name).is_some() {
            log::debug!("player {:?} already joined", name);
            return None;
        }
        self.push_player(Some(name.to_string()), queue)
    }

    fn push_player(&mut self, name: Option<String>, queue: &mut MessageQueue) -> Option<PlayerId> {
        if self.players.len() >= self.max_players {
            log::debug!("game is full ({} players)", self.max_players);
            return None;
        }
        let id = PlayerId::new(u8::try_from(self.players.len()).ok()?);
        let player = Player::new(self.node.id(), id, name);
        let child = player.id();
        log::info!("{} joined game {:?}", player, self.game_nr);
        self.players.push(player);
        self.node.announce_child(child, queue);
        Some(id)
    }

    /// Look up a container by address. `Board` has no container of its own.
    #[must_use]
    pub fn container(&self, at: ContainerRef) -> Option<&dyn Container> {
        match at {
            ContainerRef::Pile => Some(&self.pile as &dyn Container),
            ContainerRef::Board => None,
            ContainerRef::Plate(player) => self
                .players
                .get(player.index())
                .map(|p| p.plate() as &dyn Container),
            ContainerRef::Set(id) => self.board.set(id).map(|s| s as &dyn Container),
        }
    }

    fn container_mut(&mut self, at: ContainerRef) -> Option<&mut dyn Container> {
        match at {
            ContainerRef::Pile => Some(&mut self.pile as &mut dyn Container),
            ContainerRef::Board => None,
            ContainerRef::Plate(player) => self
                .players
                .get_mut(player.index())
                .map(|p| p.plate_mut() as &mut dyn Container),
            ContainerRef::Set(id) => self.board.set_mut(id).map(|s| s as &mut dyn Container),
        }
    }

    /// Move `tile` into `target`, optionally at a 1-based position.
    ///
    /// The target is asked for a fit position first; on rejection nothing
    /// changes and `false` is returned. Moving to `Board` creates a new set
    /// for the tile. Moving to the container that already holds the tile is
    /// rejected. Both containers are flagged modified.
    pub fn move_tile(
        &mut self,
        tile: TileId,
        target: ContainerRef,
        pos: Option<usize>,
        queue: &mut MessageQueue,
    ) -> bool {
        let Some(candidate) = self.tiles.get(tile).copied() else {
            log::warn!("move of unknown {}", tile);
            return false;
        };
        let source = candidate.container();
        if source == Some(target) {
            log::debug!("{} already in {}", tile, target);
            return false;
        }

        let fit = match target {
            ContainerRef::Board => 1,
            _ => match self.container(target) {
                Some(container) => container.tile_fit_position(&self.tiles, &candidate, pos),
                None => {
                    log::warn!("move of {} to missing {}", tile, target);
                    return false;
                }
            },
        };
        if fit == 0 {
            log::debug!("{} rejected by {}", candidate, target);
            return false;
        }

        if let Some(from) = source {
            match self.container_mut(from) {
                Some(container) => {
                    container.remove_tile(tile);
                    container.node_mut().set_modified(queue);
                }
                None => log::error!("{} names missing container {}", tile, from),
            }
        }

        let target = match target {
            ContainerRef::Board => ContainerRef::Set(self.board.new_set(queue)),
            other => other,
        };
        if let Some(container) = self.container_mut(target) {
            container.insert_tile(tile, fit);
            container.node_mut().set_modified(queue);
        }

        if let Some(moved) = self.tiles.get_mut(tile) {
            moved.container = Some(target);
            match (source, target) {
                (Some(ContainerRef::Plate(player)), ContainerRef::Set(_)) => moved.remember_plate(player),
                (_, ContainerRef::Set(_)) => {}
                _ => moved.forget_plate(),
            }
        }
        log::debug!("moved {} from {:?} to {} at {}", candidate, source, target, fit);
        true
    }

    /// Put a loose tile on the board as a new set at `pos`.
    pub fn place_on_board(&mut self, tile: TileId, pos: BoardPos, queue: &mut MessageQueue) -> Option<NodeId> {
        if !self.move_tile(tile, ContainerRef::Board, None, queue) {
            return None;
        }
        let Some(ContainerRef::Set(set)) = self.tiles.get(tile).and_then(Tile::container) else {
            return None;
        };
        self.set_position(set, pos, queue);
        Some(set)
    }

    /// Position a set; flags it only if the position actually changed.
    pub fn set_position(&mut self, set: NodeId, pos: BoardPos, queue: &mut MessageQueue) -> bool {
        match self.board.set_mut(set) {
            Some(target) => {
                if target.set_position(pos) {
                    target.node_mut().set_modified(queue);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Draw a random pile tile onto `player`'s plate.
    pub fn draw(&mut self, player: PlayerId, queue: &mut MessageQueue) -> Option<TileId> {
        let tile = self.pile.pick(&mut self.rng)?;
        self.move_tile(tile, ContainerRef::Plate(player), None, queue)
            .then_some(tile)
    }

    /// Deal a hand to every player and give the first player the turn.
    pub fn start(&mut self, queue: &mut MessageQueue) -> Result<(), GameError> {
        if self.players.is_empty() {
            log::error!("start of game {:?} without players", self.game_nr);
            return Err(GameError::NoPlayers);
        }
        for seat in PlayerId::all(self.players.len()) {
            for _ in 0..self.hand_size {
                if self.draw(seat, queue).is_none() {
                    log::warn!("pile exhausted while dealing to {}", seat);
                    break;
                }
            }
        }
        self.current_player_nr = Some(0);
        self.moves = 0;
        self.node.set_modified(queue);
        log::info!("game {:?} started with {} players", self.game_nr, self.players.len());
        Ok(())
    }

    /// End the current turn by drawing a tile.
    ///
    /// Any tiles placed during the turn go back to their plates. Returns
    /// the drawn tile, or `None` if the pile is empty.
    pub fn pick_tile(&mut self, queue: &mut MessageQueue) -> Result<Option<TileId>, GameError> {
        let player = self.current_player()?.player_id();
        let drawn = self.draw(player, queue);
        self.clean_up(false, queue);
        self.next_turn(queue);
        Ok(drawn)
    }

    /// Number of non-empty sets that would not survive a commit.
    #[must_use]
    pub fn invalid_sets(&self) -> usize {
        self.board.validate_sets(&self.tiles)
    }

    #[must_use]
    pub fn validate(&self) -> bool {
        self.invalid_sets() == 0
    }

    /// Settle the board.
    ///
    /// With `validate`, tiles of valid sets become permanent. Every other
    /// tile that left a plate this turn returns to it. Empty sets are
    /// pruned.
    pub fn clean_up(&mut self, validate: bool, queue: &mut MessageQueue) {
        let plan = self.board.clean_up_plan(&self.tiles, validate);
        for id in &plan.permanent {
            if let Some(tile) = self.tiles.get_mut(*id) {
                tile.forget_plate();
            }
        }
        for &(id, player) in &plan.returns {
            if !self.move_tile(id, ContainerRef::Plate(player), None, queue) {
                log::warn!("could not return {} to {}", id, player);
            }
        }
        let pruned = self.board.prune_empty(queue);
        log::debug!(
            "clean_up(validate={}): {} permanent, {} returned, {} sets pruned",
            validate,
            plan.permanent.len(),
            plan.returns.len(),
            pruned
        );
    }

    /// Hand the turn to the next seat and count the move.
    pub fn next_turn(&mut self, queue: &mut MessageQueue) {
        let next = match self.current_player_nr {
            Some(nr) if nr + 1 < self.players.len() => nr + 1,
            _ => 0,
        };
        self.current_player_nr = Some(next);
        self.moves += 1;
        self.node.set_modified(queue);
    }

    /// Finish the turn: settle the board with validation, advance the
    /// turn, then clear every modified flag.
    ///
    /// Validation of the whole board, and the revert when it fails, belong
    /// to the controller ([`crate::model::Model::commit_moves`]).
    pub fn commit(&mut self, queue: &mut MessageQueue) {
        self.clean_up(true, queue);
        self.next_turn(queue);
        graph::clear_modified(self, true);
        log::info!("game {:?} committed, move {}", self.game_nr, self.moves);
    }

    #[must_use]
    pub fn is_modified(&self, recursive: bool) -> bool {
        graph::is_modified(self, recursive)
    }

    #[must_use]
    pub fn modified_objects(&self) -> Vec<NodeId> {
        graph::modified_objects(self)
    }

    #[must_use]
    pub fn owns_node(&self, id: NodeId) -> bool {
        graph::find_node(self, id).is_some()
    }

    /// Subscribe to an event of node `node` of this game.
    pub fn subscribe(&mut self, node: NodeId, event: Event, subscriber: SubscriberId) -> Result<(), GameError> {
        let target = graph::find_node_mut(self, node).ok_or(GameError::UnknownNode(node))?;
        target.node_mut().subscribe(event, subscriber)?;
        Ok(())
    }

    /// Deliver a queued message to node `to` of this game.
    pub fn handle(&mut self, to: NodeId, message: &Message, queue: &mut MessageQueue) -> Result<(), GameError> {
        if graph::handle_node_message(self, to, message, queue) {
            Ok(())
        } else {
            Err(GameError::UnknownNode(to))
        }
    }

    /// Tiles currently away from their plate, by ascending tile id.
    #[must_use]
    pub fn origins(&self) -> Vec<(TileId, PlayerId)> {
        let mut origins: Vec<_> = self
            .tiles
            .iter()
            .filter_map(|t| t.origin().map(|player| (t.id(), player)))
            .collect();
        origins.sort_unstable();
        origins
    }

    #[must_use]
    pub fn serialize(&self) -> NodeData {
        persist::serialize(self)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        self.serialize().to_json()
    }

    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Self::from_tree(&NodeData::from_json(text)?)
    }

    /// Rebuild a game wholesale from a serialized tree.
    ///
    /// Container back references are recomputed from the membership lists.
    /// A tile listed twice, an unknown tile id, or a set whose order and
    /// membership differ makes the tree inconsistent; a tile listed nowhere
    /// goes back to the pile. The result has no modified flags set.
    pub fn from_tree(data: &NodeData) -> Result<Self, PersistError> {
        let mut game = Self::new(&GameConfig::default());
        persist::deserialize(&mut game, data)?;
        game.reconcile()?;
        graph::clear_modified(&mut game, true);
        log::debug!("rebuilt game {:?} at move {}", game.game_nr, game.moves);
        Ok(game)
    }

    /// An independent copy made by a serialize/deserialize round trip.
    pub fn clone_game(&self) -> Result<Self, PersistError> {
        Self::from_tree(&self.serialize())
    }

    fn reconcile(&mut self) -> Result<(), PersistError> {
        let mut listed: Vec<(ContainerRef, Vec<TileId>)> =
            vec![(ContainerRef::Pile, self.pile.membership().ids().to_vec())];
        listed.extend(self.players.iter().map(|p| {
            (ContainerRef::Plate(p.player_id()), p.plate().membership().ids().to_vec())
        }));
        for set in self.board.sets() {
            if !set.is_consistent() {
                log::error!("{} order and membership differ", set.id());
                return Err(PersistError::Inconsistent(format!(
                    "set order {:?} differs from membership {:?}",
                    set.order(),
                    set.membership().ids()
                )));
            }
            listed.push((ContainerRef::Set(set.id()), set.membership().ids().to_vec()));
        }

        let mut owner: FxHashMap<TileId, ContainerRef> = FxHashMap::default();
        for (at, ids) in listed {
            for id in ids {
                if !self.tiles.contains(id) {
                    log::error!("{} holds unknown {}", at, id);
                    return Err(PersistError::Inconsistent(format!("{} holds unknown {}", at, id)));
                }
                if let Some(previous) = owner.insert(id, at) {
                    log::error!("{} listed in {} and {}", id, previous, at);
                    return Err(PersistError::Inconsistent(format!(
                        "{} listed in {} and {}",
                        id, previous, at
                    )));
                }
            }
        }

        let mut orphans = Vec::new();
        for tile in self.tiles.iter_mut() {
            tile.container = owner.get(&tile.id()).copied();
            match tile.container {
                Some(ContainerRef::Set(_)) => {}
                Some(_) => tile.forget_plate(),
                None => {
                    tile.forget_plate();
                    orphans.push(tile.id());
                }
            }
        }
        orphans.sort_unstable();
        for id in orphans {
            log::warn!("{} is in no container, returning it to the pile", id);
            self.pile.membership_mut().push(id);
            if let Some(tile) = self.tiles.get_mut(id) {
                tile.container = Some(ContainerRef::Pile);
            }
        }
        Ok(())
    }
}

const GAME_ATTRIBUTES: &[&str] = &[
    "maxPlayers",
    "handSize",
    "currentPlayerNr",
    "gameNr",
    "moves",
    "rng",
    "origins",
];

impl Persistent for Game {
    fn type_tag(&self) -> &'static str {
        "Game"
    }

    fn persistent_attributes(&self) -> &'static [&'static str] {
        GAME_ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "maxPlayers" => Some(Value::from(self.max_players)),
            "handSize" => Some(Value::from(self.hand_size)),
            "currentPlayerNr" => persist::encode(&self.current_player_nr),
            "gameNr" => persist::encode(&self.game_nr),
            "moves" => Some(Value::from(self.moves)),
            "rng" => persist::encode(&self.rng.state()),
            "origins" => persist::encode(&self.origins()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: &Value) -> Result<Assignment, PersistError> {
        let tag = self.type_tag();
        match name {
            "maxPlayers" => self.max_players = persist::decode(tag, name, value)?,
            "handSize" => self.hand_size = persist::decode(tag, name, value)?,
            "currentPlayerNr" => self.current_player_nr = persist::decode(tag, name, value)?,
            "gameNr" => self.game_nr = persist::decode(tag, name, value)?,
            "moves" => self.moves = persist::decode(tag, name, value)?,
            "rng" => {
                let state: GameRngState = persist::decode(tag, name, value)?;
                self.rng = GameRng::from_state(&state);
            }
            "origins" => {
                let origins: Vec<(TileId, PlayerId)> = persist::decode(tag, name, value)?;
                for tile in self.tiles.iter_mut() {
                    tile.forget_plate();
                }
                for (id, player) in origins {
                    match self.tiles.get_mut(id) {
                        Some(tile) => tile.remember_plate(player),
                        None => {
                            return Err(PersistError::InvalidAttribute {
                                type_tag: tag.to_string(),
                                name: name.to_string(),
                                reason: format!("unknown {}", id),
                            })
                        }
                    }
                }
            }
            _ => return Ok(Assignment::Unknown),
        }
        Ok(Assignment::Applied)
    }
}

impl ModelObject for Game {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }

    fn children(&self) -> Vec<&dyn ModelObject> {
        let mut children: Vec<&dyn ModelObject> = vec![&self.board as &dyn ModelObject, &self.pile];
        children.extend(self.players.iter().map(|p| p as &dyn ModelObject));
        children
    }

    fn children_mut(&mut self) -> Vec<&mut dyn ModelObject> {
        let mut children: Vec<&mut dyn ModelObject> = vec![&mut self.board as &mut dyn ModelObject, &mut self.pile];
        children.extend(self.players.iter_mut().map(|p| p as &mut dyn ModelObject));
        children
    }

    fn child_by_tag(&mut self, tag: &str) -> Option<&mut dyn ModelObject> {
        match tag {
            "Board" => Some(&mut self.board as &mut dyn ModelObject),
            "Pile" => Some(&mut self.pile as &mut dyn ModelObject),
            _ => None,
        }
    }

    fn add_child_by_tag(&mut self, tag: &str) -> Option<&mut dyn ModelObject> {
        if tag != "Player" {
            return None;
        }
        let id = PlayerId::new(u8::try_from(self.players.len()).ok()?);
        self.players.push(Player::new(self.node.id(), id, None));
        self.players.last_mut().map(|p| p as &mut dyn ModelObject)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "game {:?} ({} players, move {})",
            self.game_nr,
            self.players.len(),
            self.moves
        )?;
        for player in &self.players {
            write!(
                f,
                "\n{}, {} tiles:{}",
                player,
                player.plate().size(),
                player.plate().membership().describe(&self.tiles)
            )?;
        }
        write!(f, "\npile: {} tiles", self.pile.size())?;
        write!(f, "\nboard: {}", self.board.describe(&self.tiles))
    }
}
