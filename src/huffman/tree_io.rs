//! Pre-order tree encoding: an internal node is a `0` bit followed by its
//! `low` then `high` subtrees, a leaf is a `1` bit followed by its symbol on
//! 8 bits. The encoding is self-delimiting, so no length is stored.

use std::io::{Read, Write};

use crate::{bitstreams::{BinaryReader, BinaryWriter}, error::{HuffError, Result}};

use super::{HuffmanTree, Node, NodeId, MAX_NODES};

/// Appends the tree to the stream and returns the number of bits it took.
/// Padding is left to the caller.
pub fn write_tree<W: Write>(tree: &HuffmanTree, writer: &mut BinaryWriter<W>) -> Result<usize> {
    let start = writer.written_bits;
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        match *tree.node(id) {
            Node::Leaf { symbol, .. } => {
                writer.push_bit(true)?;
                writer.push_bits(symbol as u64, 8)?;
            }
            Node::Internal { low, high, .. } => {
                writer.push_bit(false)?;
                stack.push(high);
                stack.push(low);
            }
        }
    }

    Ok(writer.written_bits - start)
}

/// Rebuilds a tree written by [`write_tree`], consuming exactly its bits.
/// Frequencies are not stored, so every node of the result weighs 0.
pub fn read_tree<R: Read>(reader: &mut BinaryReader<R>) -> Result<HuffmanTree> {
    let mut nodes = HuffmanTree::arena()?;
    // Internal nodes still waiting for children, with their `low` once known
    let mut pending: Vec<Option<NodeId>> = Vec::new();

    loop {
        if nodes.len() + pending.len() >= MAX_NODES {
            return Err(HuffError::wrong_input(format!("tree has more than {MAX_NODES} nodes")));
        }

        if !reader.read_bit()? {
            pending.push(None);
            continue;
        }

        let symbol = reader.read_int(8)? as u8;
        let mut done = HuffmanTree::push(&mut nodes, Node::Leaf { symbol, freq: 0 });

        // Close every internal node whose `high` subtree just completed
        loop {
            match pending.last_mut() {
                None => return Ok(HuffmanTree::from_arena(nodes, done)),
                Some(slot) => match *slot {
                    None => {
                        *slot = Some(done);
                        break;
                    }
                    Some(low) => {
                        pending.pop();
                        done = HuffmanTree::push(&mut nodes, Node::Internal { freq: 0, low, high: done });
                    }
                },
            }
        }
    }
}
