use crate::error::{HuffError, Result};

use super::{HuffmanTree, Node, MAX_CODE_LEN, NUM_SYMBOLS};

const CODE_BYTES: usize = (MAX_CODE_LEN + 7) / 8;

/// A root-to-leaf path, packed MSB-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    packed: [u8; CODE_BYTES],
    len: usize,
}

impl Default for Code {
    fn default() -> Self {
        Self { packed: [0; CODE_BYTES], len: 0 }
    }
}

impl Code {
    fn with_bit(mut self, bit: bool) -> Self {
        debug_assert!(self.len < MAX_CODE_LEN);
        if bit {
            self.packed[self.len / 8] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes holding the code; bits past `len` are zero.
    pub fn packed(&self) -> &[u8] {
        &self.packed[..(self.len + 7) / 8]
    }

    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.len, "bit {} of a {}-bit code", i, self.len);
        self.packed[i / 8] >> (7 - i % 8) & 1 == 1
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bit(i))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len).all(|i| self.bit(i) == other.bit(i))
    }
}

/// Symbol to code lookup, one entry per byte value.
#[derive(Clone, Debug)]
pub struct CodeTable {
    codes: Box<[Code]>,
}

impl CodeTable {
    /// Walks the tree once, appending 0 towards `low` and 1 towards `high`.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = Vec::new();
        codes.try_reserve_exact(NUM_SYMBOLS).map_err(HuffError::out_of_memory(NUM_SYMBOLS))?;
        codes.resize(NUM_SYMBOLS, Code::default());

        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((id, code)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => codes[symbol as usize] = code,
                Node::Internal { low, high, .. } => {
                    stack.push((high, code.with_bit(true)));
                    stack.push((low, code.with_bit(false)));
                }
            }
        }

        Ok(Self { codes: codes.into_boxed_slice() })
    }

    #[inline(always)]
    pub fn code(&self, symbol: u8) -> &Code {
        &self.codes[symbol as usize]
    }

    pub fn max_len(&self) -> usize {
        self.codes.iter().map(Code::len).max().unwrap_or(0)
    }

    /// Total payload bits needed to encode an input with these counts.
    pub fn encoded_bits(&self, frequencies: &super::FrequencyTable) -> u64 {
        (0..=u8::MAX).map(|s| frequencies.count(s) * self.code(s).len() as u64).sum()
    }
}
