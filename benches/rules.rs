use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rummikub_engine::core::{Color, GameConfig, Tile, TileId};
use rummikub_engine::game::Game;
use rummikub_engine::pubsub::MessageQueue;
use rummikub_engine::rules::{fit_position, set_type};

fn full_run() -> Vec<Tile> {
    (1..=13u8)
        .map(|v| Tile::number(TileId::new(u32::from(v)), Color::Blue, v))
        .collect()
}

fn bench_set_type(c: &mut Criterion) {
    let run = full_run();
    let mut jokered = run.clone();
    jokered[4] = Tile::joker(TileId::new(104), Color::Black);
    jokered[5] = Tile::joker(TileId::new(105), Color::Red);

    c.bench_function("set_type_run_13", |b| b.iter(|| set_type(black_box(&run))));
    c.bench_function("set_type_run_13_two_jokers", |b| {
        b.iter(|| set_type(black_box(&jokered)))
    });
}

fn bench_fit_position(c: &mut Criterion) {
    let run: Vec<Tile> = full_run().into_iter().take(12).collect();
    let group = [
        Tile::number(TileId::new(0), Color::Black, 7),
        Tile::number(TileId::new(1), Color::Blue, 7),
        Tile::number(TileId::new(2), Color::Red, 7),
    ];
    let joker = Tile::joker(TileId::new(104), Color::Black);
    let stranger = Tile::number(TileId::new(60), Color::Red, 2);

    c.bench_function("fit_joker_into_group", |b| {
        b.iter(|| fit_position(black_box(&group), black_box(&joker), None))
    });
    c.bench_function("fit_rejected_from_run", |b| {
        b.iter(|| fit_position(black_box(&run), black_box(&stranger), None))
    });
}

fn bench_clone_game(c: &mut Criterion) {
    let mut queue = MessageQueue::new();
    let mut game = Game::new(&GameConfig::new().seed(12345));
    for _ in 0..4 {
        game.add_player(&mut queue);
    }
    let _ = game.start(&mut queue);

    c.bench_function("clone_game_4_players", |b| b.iter(|| game.clone_game()));
}

criterion_group!(benches, bench_set_type, bench_fit_position, bench_clone_game);
criterion_main!(benches);
