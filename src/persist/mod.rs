//! Persistence: the nested attribute tree and the generic serializer.
//!
//! The same tree is the save-file format, the payload the server
//! broadcasts, and the cloning mechanism: a round trip through
//! [`serialize`] and [`deserialize`] yields an independent copy that
//! shares nothing with the original.

pub mod tree;
pub mod persistent;
pub mod serializer;
mod error;

pub use tree::NodeData;
pub use persistent::{decode, encode, Assignment, Persistent};
pub use serializer::{deserialize, serialize};
pub use error::PersistError;
