//! Contextual joker resolution.
//!
//! A joker has no face of its own. Its value and color are read from its
//! neighbours in the ordered list under evaluation (a candidate list, not
//! necessarily the set's committed order), under a set-type hypothesis:
//!
//! - **Run**: value follows the left neighbour (+1), or precedes the right
//!   neighbour (-1); color is the run's color.
//! - **Group**: value is the group's value; color is always `NoColor`, so
//!   jokers never count toward color distinctness.
//!
//! Adjacent jokers resolve through each other: `[3, J, J, 6]` reads as
//! `3 4 5 6`.

use crate::core::{Color, Tile};

use super::sets::SetType;

/// Effective value and color of a tile in context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub value: i32,
    pub color: Color,
}

/// Effective values of `tiles` read as a run.
///
/// Numbered tiles keep their value. Jokers after the first numbered tile
/// continue from their left neighbour; leading jokers count down from the
/// first numbered tile. A list without numbered tiles keeps the sentinels.
#[must_use]
pub fn run_values(tiles: &[Tile]) -> Vec<i32> {
    let mut values: Vec<i32> = tiles.iter().map(|t| i32::from(t.value())).collect();
    let Some(anchor) = tiles.iter().position(|t| !t.is_joker()) else {
        return values;
    };

    for i in (0..anchor).rev() {
        values[i] = values[i + 1] - 1;
    }
    for i in anchor + 1..tiles.len() {
        if tiles[i].is_joker() {
            values[i] = values[i - 1] + 1;
        }
    }
    values
}

/// Color shared by the numbered tiles of a run candidate.
fn run_color(tiles: &[Tile]) -> Color {
    tiles
        .iter()
        .find(|t| !t.is_joker())
        .map_or(Color::NoColor, Tile::color)
}

/// Resolve the face of every tile in `tiles` under a set-type hypothesis.
///
/// `Undecided` and `Invalid` leave jokers at their stored sentinel face.
#[must_use]
pub fn resolve_faces(tiles: &[Tile], set_type: SetType) -> Vec<Face> {
    match set_type {
        SetType::Run => {
            let color = run_color(tiles);
            run_values(tiles)
                .into_iter()
                .zip(tiles)
                .map(|(value, tile)| Face {
                    value,
                    color: if tile.is_joker() { color } else { tile.color() },
                })
                .collect()
        }
        SetType::Group => {
            let value = tiles
                .iter()
                .find(|t| !t.is_joker())
                .map_or(0, |t| i32::from(t.value()));
            tiles
                .iter()
                .map(|tile| {
                    if tile.is_joker() {
                        Face { value, color: Color::NoColor }
                    } else {
                        Face { value: i32::from(tile.value()), color: tile.color() }
                    }
                })
                .collect()
        }
        SetType::Undecided | SetType::Invalid => tiles
            .iter()
            .map(|t| Face { value: i32::from(t.value()), color: t.color() })
            .collect(),
    }
}
