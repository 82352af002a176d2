pub mod frequency;
pub mod tree;
pub mod tree_io;
pub mod code_table;

pub use frequency::FrequencyTable;
pub use tree::{HuffmanTree, Node, NodeId};
pub use tree_io::{read_tree, write_tree};
pub use code_table::{Code, CodeTable};

/// Size of the byte alphabet; every tree is built over all of it.
pub const NUM_SYMBOLS: usize = 256;
/// A strict binary tree over `NUM_SYMBOLS` leaves.
pub const MAX_NODES: usize = 2 * NUM_SYMBOLS - 1;
/// Longest possible root-to-leaf path in such a tree.
pub const MAX_CODE_LEN: usize = NUM_SYMBOLS - 1;
