//! Opening repertoire core: move lines, the opening tree, PGN import and the
//! board driver used to drill a line against the player.

pub mod driller;
pub mod engine;
pub mod error;
pub mod moves;
pub mod opening_tree;
pub mod pgn;

pub use moves::{line_id, Opening, OpeningMove};
pub use opening_tree::{build_opening_tree, CollisionPolicy, NodeId, OpeningNode, OpeningTree};
