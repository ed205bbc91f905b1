//! Rule engine tests: set-type inference, joker resolution, placement limits.

use proptest::prelude::*;

use rummikub_engine::core::{Color, Tile, TileId, MAX_TILE_VALUE};
use rummikub_engine::rules::{fit_position, is_valid_set, resolve_faces, set_type, Face, SetType};

fn tile(id: u32, color: Color, value: u8) -> Tile {
    Tile::number(TileId::new(id), color, value)
}

fn joker(id: u32) -> Tile {
    Tile::joker(TileId::new(id), Color::Red)
}

fn run(color: Color, start: u8, len: u8) -> Vec<Tile> {
    (0..len)
        .map(|i| tile(u32::from(i), color, start + i))
        .collect()
}

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

/// Test that the same three tiles form a run in one color and nothing in mixed colors.
#[test]
fn test_run_requires_one_color() {
    let same = run(Color::Black, 1, 3);
    assert_eq!(set_type(&same), SetType::Run);
    assert!(is_valid_set(&same));

    let mixed = [tile(0, Color::Black, 1), tile(1, Color::Blue, 2), tile(2, Color::Black, 3)];
    assert_eq!(set_type(&mixed), SetType::Invalid);
    assert!(!is_valid_set(&mixed));
}

/// Test the joker in a run takes the value before its right neighbour.
#[test]
fn test_joker_resolves_in_run() {
    let tiles = [joker(104), tile(1, Color::Black, 7), tile(2, Color::Black, 8)];
    assert_eq!(set_type(&tiles), SetType::Run);
    let faces = resolve_faces(&tiles, SetType::Run);
    assert_eq!(faces[0], Face { value: 6, color: Color::Black });
}

/// Test the joker in a group carries no color and the group is accepted.
#[test]
fn test_joker_resolves_in_group() {
    let tiles = [joker(104), tile(1, Color::Black, 1), tile(2, Color::Red, 1)];
    assert_eq!(set_type(&tiles), SetType::Group);
    assert!(is_valid_set(&tiles));
    let faces = resolve_faces(&tiles, SetType::Group);
    assert_eq!(faces[0].color, Color::NoColor);
}

/// Test a joker still fits a group that lacks a color.
#[test]
fn test_joker_fits_three_color_group() {
    let group = [tile(0, Color::Black, 7), tile(1, Color::Blue, 7), tile(2, Color::Red, 7)];
    assert_eq!(fit_position(&group, &joker(104), None), 4);
    assert_eq!(fit_position(&group, &tile(3, Color::Orange, 7), None), 4);
    assert_eq!(fit_position(&group, &tile(3, Color::Black, 7), None), 0);
}

/// Test a complete run accepts nothing, not even a joker.
#[test]
fn test_full_run_rejects_everything() {
    let full = run(Color::Orange, 1, MAX_TILE_VALUE);
    assert_eq!(set_type(&full), SetType::Run);
    assert_eq!(fit_position(&full, &joker(104), None), 0);
    assert_eq!(fit_position(&full, &joker(104), Some(5)), 0);
    assert_eq!(fit_position(&full, &tile(50, Color::Orange, 13), None), 0);
}

/// Test explicit positions outside the list are rejected.
#[test]
fn test_position_out_of_range() {
    let tiles = run(Color::Blue, 4, 3);
    let next = tile(10, Color::Blue, 7);
    assert_eq!(fit_position(&tiles, &next, Some(4)), 4);
    assert_eq!(fit_position(&tiles, &next, Some(5)), 0);
    assert_eq!(fit_position(&tiles, &next, Some(0)), 0);
}

proptest! {
    /// Any ascending one-color run of at least three tiles is valid.
    #[test]
    fn prop_ascending_runs_valid(color in color_strategy(), start in 1u8..=11, extra in 0u8..=10) {
        let len = (3 + extra).min(MAX_TILE_VALUE - start + 1);
        let tiles = run(color, start, len);
        prop_assert_eq!(set_type(&tiles), SetType::Run);
        prop_assert!(is_valid_set(&tiles));
    }

    /// A run in any order other than ascending is invalid.
    #[test]
    fn prop_run_is_order_sensitive(
        color in color_strategy(),
        start in 1u8..=9,
        shuffle in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let sorted = run(color, start, 5);
        let permuted: Vec<Tile> = shuffle.iter().map(|&i| sorted[i]).collect();
        let ascending = shuffle.windows(2).all(|w| w[0] < w[1]);
        prop_assert_eq!(set_type(&permuted) == SetType::Run, ascending);
    }

    /// Recoloring one tile of a run breaks it.
    #[test]
    fn prop_mixed_color_run_invalid(start in 1u8..=11, which in 0usize..3, offset in 1usize..4) {
        let mut tiles = run(Color::Black, start, 3);
        let other = Color::ALL[offset];
        tiles[which] = tile(tiles[which].id().raw(), other, tiles[which].value());
        prop_assert_eq!(set_type(&tiles), SetType::Invalid);
    }

    /// A four-color group accepts no fifth tile.
    #[test]
    fn prop_full_group_rejects_fifth(color in color_strategy(), value in 1u8..=MAX_TILE_VALUE, pos in 1usize..=5) {
        let group: Vec<Tile> = Color::ALL
            .iter()
            .enumerate()
            .map(|(i, &c)| tile(i as u32, c, 7))
            .collect();
        let candidate = tile(99, color, value);
        prop_assert_eq!(fit_position(&group, &candidate, None), 0);
        prop_assert_eq!(fit_position(&group, &candidate, Some(pos)), 0);
        prop_assert_eq!(fit_position(&group, &joker(104), None), 0);
    }
}
