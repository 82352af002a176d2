use std::{collections::BinaryHeap, cmp::Reverse};

use crate::error::{HuffError, Result};

use super::{FrequencyTable, MAX_NODES, NUM_SYMBOLS};

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    /// `low` is reached with bit 0, `high` with bit 1.
    Internal {
        freq: u64,
        low: NodeId,
        high: NodeId,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Entry of the forest while merging: ordered by frequency, then by `order`.
/// Leaves take their symbol value as order, the k-th merged node takes
/// `NUM_SYMBOLS + k`, so among equal frequencies newer nodes come last.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HeapNode {
    freq: u64,
    order: usize,
    id: NodeId,
}

/// A strict binary tree stored in a single arena. Dropping the tree frees
/// every node at once, whichever way the owning operation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    pub(crate) fn arena() -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(MAX_NODES).map_err(HuffError::out_of_memory(MAX_NODES))?;
        Ok(nodes)
    }

    pub(crate) fn push(nodes: &mut Vec<Node>, node: Node) -> NodeId {
        nodes.push(node);
        nodes.len() - 1
    }

    pub(crate) fn from_arena(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root < nodes.len());
        Self { nodes, root }
    }

    /// Builds the tree over all `NUM_SYMBOLS` leaves, zero counts included,
    /// by repeatedly merging the two smallest entries of the forest.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut nodes = Self::arena()?;

        let mut forest = BinaryHeap::new();
        forest.try_reserve_exact(NUM_SYMBOLS).map_err(HuffError::out_of_memory(NUM_SYMBOLS))?;

        // Leaves enter the arena in symbol order, so a leaf's id is its symbol.
        for leaf in frequencies.clone().into_forest() {
            let freq = leaf.freq();
            let id = Self::push(&mut nodes, leaf);
            forest.push(Reverse(HeapNode { freq, order: id, id }));
        }

        let mut order = NUM_SYMBOLS;

        while let Some(Reverse(low)) = forest.pop() {
            let Some(Reverse(high)) = forest.pop() else {
                log::debug!("built tree of {} nodes, root weight {}", nodes.len(), low.freq);
                return Ok(Self::from_arena(nodes, low.id));
            };

            let freq = low.freq + high.freq;
            let id = Self::push(&mut nodes, Node::Internal { freq, low: low.id, high: high.id });

            forest.push(Reverse(HeapNode { freq, order, id }));
            order += 1;
        }

        unreachable!("the forest always starts with {NUM_SYMBOLS} leaves")
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    pub fn weight(&self) -> u64 {
        self.nodes[self.root].freq()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => height = height.max(depth),
                Node::Internal { low, high, .. } => {
                    stack.push((high, depth + 1));
                    stack.push((low, depth + 1));
                }
            }
        }

        height
    }
}
