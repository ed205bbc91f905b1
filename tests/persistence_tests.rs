//! Persistence tests: tree round trips after play, cloning, save files.

use std::path::PathBuf;

use proptest::prelude::*;

use rummikub_engine::containers::{Container, ContainerRef};
use rummikub_engine::core::{GameConfig, PlayerId, TileId};
use rummikub_engine::game::Game;
use rummikub_engine::model::{ServerError, Session};
use rummikub_engine::persist::{NodeData, PersistError};
use rummikub_engine::pubsub::{MessageQueue, SubscriberId};

fn flush(game: &mut Game, queue: &mut MessageQueue) {
    queue.drain(|envelope, queue| {
        if let SubscriberId::Node(to) = envelope.to {
            let _ = game.handle(to, &envelope.message, queue);
        }
    });
}

fn started(players: usize, seed: u64, queue: &mut MessageQueue) -> Game {
    let mut game = Game::new(&GameConfig::new().seed(seed));
    for _ in 0..players {
        game.add_player(queue).unwrap();
    }
    game.start(queue).unwrap();
    flush(&mut game, queue);
    game
}

/// One step of random play by the current player.
#[derive(Clone, Debug)]
enum Step {
    Pick,
    Commit,
    /// Plate tile (by index) to a new set.
    Lay(usize),
    /// Plate tile (by index) into an existing set (by index).
    Extend(usize, usize),
    /// Board tile (by index) back to the current plate.
    Take(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Pick),
        1 => Just(Step::Commit),
        3 => any::<usize>().prop_map(Step::Lay),
        4 => (any::<usize>(), any::<usize>()).prop_map(|(t, s)| Step::Extend(t, s)),
        2 => any::<usize>().prop_map(Step::Take),
    ]
}

fn apply(game: &mut Game, step: &Step, queue: &mut MessageQueue) {
    let seat = game.current_player().unwrap().player_id();
    let hand = game.players()[seat.index()].plate().membership().ids().to_vec();
    match *step {
        Step::Pick => {
            game.pick_tile(queue).unwrap();
        }
        Step::Commit => game.commit(queue),
        Step::Lay(t) if !hand.is_empty() => {
            game.move_tile(hand[t % hand.len()], ContainerRef::Board, None, queue);
        }
        Step::Extend(t, s) if !hand.is_empty() && !game.board().sets().is_empty() => {
            let sets = game.board().sets();
            let target = sets[s % sets.len()].container_ref();
            game.move_tile(hand[t % hand.len()], target, None, queue);
        }
        Step::Take(t) => {
            let board = game.board().tile_ids();
            if !board.is_empty() {
                game.move_tile(board[t % board.len()], ContainerRef::Plate(seat), None, queue);
            }
        }
        _ => {}
    }
    flush(game, queue);
}

fn assert_conserved(game: &Game) {
    let mut held: Vec<TileId> = game.pile().membership().ids().to_vec();
    for player in game.players() {
        held.extend_from_slice(player.plate().membership().ids());
    }
    held.extend(game.board().tile_ids());
    held.sort_unstable();
    let expected: Vec<TileId> = (0..106).map(TileId::new).collect();
    assert_eq!(held, expected);
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rummikub-{}-{}.json", std::process::id(), name))
}

/// Test that a clone is structurally identical and fully independent.
#[test]
fn test_clone_is_independent() {
    let mut queue = MessageQueue::new();
    let mut game = started(3, 17, &mut queue);
    let tile = game.players()[0].plate().membership().ids()[0];
    game.move_tile(tile, ContainerRef::Board, None, &mut queue);

    let mut copy = game.clone_game().unwrap();
    assert_eq!(copy.serialize(), game.serialize());
    assert!(!copy.is_modified(true));

    copy.clean_up(false, &mut queue);
    assert!(copy.board().sets().is_empty());
    assert_eq!(game.board().sets().len(), 1);
}

/// Test that a clone made mid-turn still knows where placed tiles came from.
#[test]
fn test_clone_keeps_origins() {
    let mut queue = MessageQueue::new();
    let mut game = started(2, 9, &mut queue);
    let tile = game.players()[1].plate().membership().ids()[3];
    game.move_tile(tile, ContainerRef::Board, None, &mut queue);

    let mut copy = game.clone_game().unwrap();
    assert_eq!(copy.tile(tile).unwrap().origin(), Some(PlayerId::new(1)));
    copy.clean_up(false, &mut queue);
    assert!(copy.players()[1].plate().contains_tile(tile));
}

/// Test that the RNG continues the same draw sequence after a clone.
#[test]
fn test_clone_continues_draws() {
    let mut queue = MessageQueue::new();
    let mut game = started(2, 33, &mut queue);
    let mut copy = game.clone_game().unwrap();

    for _ in 0..5 {
        let a = game.pick_tile(&mut queue).unwrap();
        let b = copy.pick_tile(&mut queue).unwrap();
        assert_eq!(a, b);
    }
}

/// Test that JSON text survives as the same tree.
#[test]
fn test_json_round_trip() {
    let mut queue = MessageQueue::new();
    let game = started(2, 5, &mut queue);
    let text = game.to_json().unwrap();
    assert!(!text.contains('\n'));
    assert!(text.starts_with("{\"type\":\"Game\""));

    let back = Game::from_json(&text).unwrap();
    assert_eq!(back.serialize(), game.serialize());
}

/// Test that a tile listed in two containers is refused.
#[test]
fn test_duplicate_membership_rejected() {
    let mut queue = MessageQueue::new();
    let game = started(2, 5, &mut queue);
    let mut tree = game.serialize();

    let stolen = game.pile().membership().ids()[0];
    let player = tree.elements.iter_mut().find(|e| e.type_tag == "Player").unwrap();
    let plate = &mut player.elements[0];
    plate.attributes["tiles"].as_array_mut().unwrap().push(stolen.raw().into());

    let err = Game::from_tree(&tree).unwrap_err();
    assert!(matches!(err, PersistError::Inconsistent(_)));
}

/// Test that a tile listed nowhere ends up back in the pile.
#[test]
fn test_orphan_returns_to_pile() {
    let mut queue = MessageQueue::new();
    let game = started(2, 5, &mut queue);
    let mut tree = game.serialize();

    let player = tree.elements.iter_mut().find(|e| e.type_tag == "Player").unwrap();
    let tiles = player.elements[0].attributes["tiles"].as_array_mut().unwrap();
    let lost = TileId::new(tiles.pop().unwrap().as_u64().unwrap() as u32);

    let back = Game::from_tree(&tree).unwrap();
    assert_eq!(back.tile(lost).unwrap().container(), Some(ContainerRef::Pile));
    assert_eq!(back.players()[0].plate().size(), 13);
    assert_conserved(&back);
}

/// Test that a tree of the wrong type is refused and unknown attributes are skipped.
#[test]
fn test_tree_drift() {
    assert!(matches!(
        Game::from_tree(&NodeData::new("Board")),
        Err(PersistError::TypeMismatch { .. })
    ));

    let mut queue = MessageQueue::new();
    let game = started(2, 5, &mut queue);
    let mut tree = game.serialize();
    tree.attributes.insert("spectators".into(), 3.into());
    tree.elements.push(NodeData::new("Scoreboard"));
    let back = Game::from_tree(&tree).unwrap();
    assert_eq!(back.serialize(), game.serialize());
}

/// Test that a saved game loads back under its game number.
#[test]
fn test_save_and_load() {
    let mut session = Session::new(GameConfig::new().seed(12));
    let nr = session.new_game(3);
    session.add_player(nr, "ann").unwrap();
    session.add_player(nr, "bob").unwrap();
    session.start_game(nr).unwrap();

    let path = temp_path("save");
    session.save_game(nr, &path).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved.lines().count(), 1);

    let mut other = Session::new(GameConfig::new());
    let loaded = other.load_game(&path).unwrap();
    assert_eq!(loaded, nr);
    assert_eq!(
        other.server().get_game(nr).unwrap().serialize(),
        session.server().get_game(nr).unwrap().serialize()
    );
    assert_eq!(other.new_game(2), nr + 1);

    std::fs::remove_file(&path).unwrap();
}

/// Test that empty and unreadable save files are reported.
#[test]
fn test_load_bad_files() {
    let mut session = Session::new(GameConfig::new());

    let empty = temp_path("empty");
    std::fs::write(&empty, "").unwrap();
    assert!(matches!(session.load_game(&empty), Err(ServerError::EmptySave(_))));
    std::fs::remove_file(&empty).unwrap();

    let garbled = temp_path("garbled");
    std::fs::write(&garbled, "{\"type\":\"Game\",").unwrap();
    assert!(matches!(
        session.load_game(&garbled),
        Err(ServerError::Persist(PersistError::Json(_)))
    ));
    std::fs::remove_file(&garbled).unwrap();

    assert!(matches!(
        session.load_game(temp_path("missing")),
        Err(ServerError::Persist(PersistError::Io(_)))
    ));
    assert!(matches!(session.save_game(4, temp_path("none")), Err(ServerError::UnknownGame(4))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Random play never duplicates or loses a tile.
    #[test]
    fn prop_membership_conserved(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..40)) {
        let mut queue = MessageQueue::new();
        let mut game = started(3, seed, &mut queue);
        for step in &steps {
            apply(&mut game, step, &mut queue);
            assert_conserved(&game);
        }
        for tile in game.tiles().iter() {
            let at = tile.container().unwrap();
            prop_assert!(game.container(at).map_or(false, |c| c.contains_tile(tile.id())));
        }
    }

    /// Serializing the deserialized tree gives back the same tree.
    #[test]
    fn prop_round_trip_after_play(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..40)) {
        let mut queue = MessageQueue::new();
        let mut game = started(2, seed, &mut queue);
        for step in &steps {
            apply(&mut game, step, &mut queue);
        }
        let tree = game.serialize();
        let back = Game::from_tree(&tree).unwrap();
        prop_assert_eq!(back.serialize(), tree);
    }
}
