//! The game aggregate: players, board, pile and the turn state machine.

#[allow(clippy::module_inception)]
pub mod game;
pub mod player;
mod error;

pub use game::Game;
pub use player::Player;
pub use error::GameError;
