//! Tile containers: the pile, plates, the board and its sets.
//!
//! Containers hold tile ids, never tiles. A tile id is a member of at most
//! one container at a time, and its registry entry names that container.
//! Moving a tile between containers is orchestrated by
//! [`Game::move_tile`](crate::game::Game::move_tile), which asks the target
//! for a fit position before touching either side.

pub mod container;
pub mod set;
pub mod board;
pub mod pile;
pub mod plate;

pub use container::{Container, ContainerRef, TileContainer};
pub use set::{BoardPos, TileSet};
pub use board::{Board, CleanUp};
pub use pile::Pile;
pub use plate::Plate;
