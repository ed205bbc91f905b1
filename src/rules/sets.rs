//! Set-type inference and tile placement.
//!
//! A set's type is inferred from its ordered tiles every time it is
//! evaluated; nothing about the type is stored. Placement asks "what type
//! would the set have with this tile appended / prepended / spliced in?"
//! and accepts the tile when the answer is not `Invalid`.

use smallvec::SmallVec;

use crate::core::{Color, Tile, MAX_GROUP_SIZE, MAX_RUN_SIZE, MAX_TILE_VALUE, MIN_SET_SIZE};

use super::joker::run_values;

/// Inferred type of an ordered tile list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetType {
    /// Not enough information yet: one numbered tile plus jokers, all jokers,
    /// or numbered tiles that share both color and value.
    Undecided,
    /// Same value, pairwise distinct colors.
    Group,
    /// Same color, consecutive values.
    Run,
    Invalid,
}

impl SetType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SetType::Undecided => "Undecided",
            SetType::Group => "Group",
            SetType::Run => "Run",
            SetType::Invalid => "Invalid",
        }
    }
}

impl std::fmt::Display for SetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Occurrence tally keyed by color or value.
struct Tally<K: PartialEq, const N: usize> {
    entries: SmallVec<[(K, usize); N]>,
}

impl<K: PartialEq, const N: usize> Tally<K, N> {
    fn new() -> Self {
        Self { entries: SmallVec::new() }
    }

    fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    fn distinct(&self) -> usize {
        self.entries.len()
    }

    fn doubles(&self) -> usize {
        self.entries.iter().filter(|(_, count)| *count > 1).count()
    }
}

/// Whether `tiles` reads as a run: every adjacent pair of contextual values
/// differs by exactly one.
///
/// Tracks the largest and smallest adjacent difference; both must be 1.
#[must_use]
pub fn is_valid_run(tiles: &[Tile]) -> bool {
    let values = run_values(tiles);
    let mut largest = 0;
    let mut smallest = i32::from(MAX_TILE_VALUE);
    for pair in values.windows(2) {
        let diff = pair[1] - pair[0];
        largest = largest.max(diff);
        smallest = smallest.min(diff);
    }
    largest == 1 && smallest == 1
}

/// Infer the type of an ordered tile list (jokers included).
///
/// ```
/// use rummikub_engine::core::{Color, Tile, TileId};
/// use rummikub_engine::rules::{set_type, SetType};
///
/// let run = [
///     Tile::number(TileId::new(0), Color::Blue, 1),
///     Tile::number(TileId::new(1), Color::Blue, 2),
///     Tile::number(TileId::new(2), Color::Blue, 3),
/// ];
/// assert_eq!(set_type(&run), SetType::Run);
///
/// let mixed = [
///     Tile::number(TileId::new(0), Color::Blue, 1),
///     Tile::number(TileId::new(1), Color::Red, 2),
///     Tile::number(TileId::new(2), Color::Blue, 3),
/// ];
/// assert_eq!(set_type(&mixed), SetType::Invalid);
/// ```
#[must_use]
pub fn set_type(tiles: &[Tile]) -> SetType {
    let mut colors: Tally<Color, 4> = Tally::new();
    let mut values: Tally<u8, 13> = Tally::new();
    let mut jokers = 0;

    for tile in tiles {
        if tile.is_joker() {
            jokers += 1;
        } else {
            colors.add(tile.color());
            values.add(tile.value());
        }
    }

    let n = tiles.len();
    let dc = colors.distinct();
    let dv = values.distinct();

    let result = if (dc == 1 && dv == 1) || n - jokers <= 1 {
        SetType::Undecided
    } else if dc == 1 && dv > 1 {
        if values.doubles() == 0 && n <= MAX_RUN_SIZE && is_valid_run(tiles) {
            SetType::Run
        } else {
            SetType::Invalid
        }
    } else if dc > 1 && dv == 1 {
        if colors.doubles() == 0 && n <= MAX_GROUP_SIZE {
            SetType::Group
        } else {
            SetType::Invalid
        }
    } else {
        SetType::Invalid
    };

    log::debug!("set_type: n={} dv={} dc={} jokers={} -> {}", n, dv, dc, jokers, result);
    result
}

/// 1-based position at which `candidate` may join the ordered tiles of a
/// set; 0 means rejected.
///
/// Without an explicit position the tile is tried at the end (`len + 1`),
/// then at the front (`1`). With a position the tile is spliced in at that
/// ordinal and accepted only if the whole list stays non-`Invalid`.
/// A tile already in the list is always rejected.
#[must_use]
pub fn fit_position(ordered: &[Tile], candidate: &Tile, pos: Option<usize>) -> usize {
    if ordered.iter().any(|t| t.id() == candidate.id()) {
        return 0;
    }

    let n = ordered.len();
    let fit = match pos {
        None => {
            let mut appended = ordered.to_vec();
            appended.push(*candidate);
            if set_type(&appended) != SetType::Invalid {
                n + 1
            } else {
                let mut prepended = Vec::with_capacity(n + 1);
                prepended.push(*candidate);
                prepended.extend_from_slice(ordered);
                if set_type(&prepended) != SetType::Invalid {
                    1
                } else {
                    0
                }
            }
        }
        Some(p) if (1..=n + 1).contains(&p) => {
            let mut spliced = ordered.to_vec();
            spliced.insert(p - 1, *candidate);
            if set_type(&spliced) != SetType::Invalid {
                p
            } else {
                0
            }
        }
        Some(_) => 0,
    };

    log::debug!("fit_position: {} into {} tiles at {:?} -> {}", candidate, n, pos, fit);
    fit
}

/// A set survives a commit when it has at least three tiles and its type is
/// not `Invalid`.
#[must_use]
pub fn is_valid_set(ordered: &[Tile]) -> bool {
    ordered.len() >= MIN_SET_SIZE && set_type(ordered) != SetType::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TileId;

    fn tile(id: u32, color: Color, value: u8) -> Tile {
        Tile::number(TileId::new(id), color, value)
    }

    fn joker(id: u32) -> Tile {
        Tile::joker(TileId::new(id), Color::Red)
    }

    fn run(color: Color, values: std::ops::RangeInclusive<u8>) -> Vec<Tile> {
        values.map(|v| tile(u32::from(v), color, v)).collect()
    }

    #[test]
    fn test_undecided_cases() {
        assert_eq!(set_type(&[]), SetType::Undecided);
        assert_eq!(set_type(&[tile(0, Color::Blue, 4)]), SetType::Undecided);
        assert_eq!(set_type(&[joker(104), joker(105)]), SetType::Undecided);
        assert_eq!(set_type(&[joker(104), tile(0, Color::Blue, 4), joker(105)]), SetType::Undecided);
    }

    #[test]
    fn test_run_and_group() {
        assert_eq!(set_type(&run(Color::Orange, 4..=7)), SetType::Run);

        let group = [tile(0, Color::Black, 9), tile(1, Color::Red, 9), tile(2, Color::Blue, 9)];
        assert_eq!(set_type(&group), SetType::Group);
    }

    #[test]
    fn test_run_with_gap_invalid() {
        let tiles = [tile(0, Color::Red, 1), tile(1, Color::Red, 2), tile(2, Color::Red, 4)];
        assert_eq!(set_type(&tiles), SetType::Invalid);
    }

    #[test]
    fn test_run_order_sensitive() {
        let tiles = [tile(0, Color::Red, 2), tile(1, Color::Red, 1), tile(2, Color::Red, 3)];
        assert_eq!(set_type(&tiles), SetType::Invalid);
    }

    #[test]
    fn test_group_duplicate_color_invalid() {
        let tiles = [tile(0, Color::Black, 9), tile(1, Color::Red, 9), tile(2, Color::Red, 9)];
        assert_eq!(set_type(&tiles), SetType::Invalid);
    }

    #[test]
    fn test_joker_run_resolution() {
        let tiles = [joker(104), tile(0, Color::Black, 7), tile(1, Color::Black, 8)];
        assert_eq!(set_type(&tiles), SetType::Run);
    }

    #[test]
    fn test_joker_group_resolution() {
        let tiles = [joker(104), tile(0, Color::Black, 1), tile(1, Color::Red, 1)];
        assert_eq!(set_type(&tiles), SetType::Group);
        assert!(is_valid_set(&tiles));
    }

    #[test]
    fn test_fit_append_then_prepend() {
        let ordered = run(Color::Blue, 4..=6);
        assert_eq!(fit_position(&ordered, &tile(20, Color::Blue, 7), None), 4);
        assert_eq!(fit_position(&ordered, &tile(21, Color::Blue, 3), None), 1);
        assert_eq!(fit_position(&ordered, &tile(22, Color::Blue, 9), None), 0);
        assert_eq!(fit_position(&ordered, &tile(23, Color::Red, 7), None), 0);
    }

    #[test]
    fn test_fit_explicit_position() {
        let ordered = [tile(0, Color::Blue, 4), tile(1, Color::Blue, 6)];
        assert_eq!(fit_position(&ordered, &tile(2, Color::Blue, 5), Some(2)), 2);
        assert_eq!(fit_position(&ordered, &tile(2, Color::Blue, 5), Some(3)), 0);
        assert_eq!(fit_position(&ordered, &tile(2, Color::Blue, 5), Some(0)), 0);
        assert_eq!(fit_position(&ordered, &tile(2, Color::Blue, 5), Some(9)), 0);
    }

    #[test]
    fn test_fit_rejects_member() {
        let ordered = run(Color::Blue, 4..=6);
        assert_eq!(fit_position(&ordered, &ordered[0], None), 0);
    }

    #[test]
    fn test_full_group_rejects_everything() {
        let group: Vec<_> = Color::ALL
            .iter()
            .enumerate()
            .map(|(i, &c)| tile(i as u32, c, 7))
            .collect();
        assert_eq!(fit_position(&group, &joker(104), None), 0);
        assert_eq!(fit_position(&group, &tile(50, Color::Red, 7), None), 0);
        assert_eq!(fit_position(&group, &tile(51, Color::Red, 8), None), 0);
    }

    #[test]
    fn test_partial_group_accepts_joker() {
        let group = [tile(0, Color::Black, 7), tile(1, Color::Red, 7), tile(2, Color::Blue, 7)];
        assert_eq!(fit_position(&group, &joker(104), None), 4);
    }

    #[test]
    fn test_run_capped_at_thirteen() {
        let full = run(Color::Black, 1..=13);
        assert_eq!(set_type(&full), SetType::Run);
        assert_eq!(fit_position(&full, &joker(104), None), 0);
    }

    #[test]
    fn test_small_sets_not_valid() {
        let pair = [tile(0, Color::Black, 1), tile(1, Color::Black, 2)];
        assert_eq!(set_type(&pair), SetType::Run);
        assert!(!is_valid_set(&pair));
    }
}
