//! Rule engine: set-type inference, joker resolution and placement.
//!
//! Everything here is a pure function of an ordered tile list. The
//! containers call into these functions; nothing in this module knows
//! about containers, turns or the object graph.

pub mod joker;
pub mod sets;

pub use joker::{resolve_faces, run_values, Face};
pub use sets::{fit_position, is_valid_run, is_valid_set, set_type, SetType};
