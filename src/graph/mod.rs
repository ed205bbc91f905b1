//! The object graph over non-tile entities.
//!
//! Game, players, plates, the board, its sets and the pile form an owned
//! tree. Each node carries a [`NodeState`]: a runtime id, its parent's id,
//! a modified flag and a publisher whose `ObjectModified` event the parent
//! always listens to. Flagging a leaf therefore flags every ancestor up to
//! the game root, one queued dispatch per hop.

pub mod node;
pub mod object;

pub use node::{NodeId, NodeState, NODE_EVENTS};
pub use object::{
    clear_modified, find_node, find_node_mut, handle_node_message, is_modified, modified_objects,
    set_modified, ModelObject,
};
