use std::io::{ErrorKind, Read};

use crate::error::{HuffError, Result};

use super::{Node, NUM_SYMBOLS};

/// Occurrence counts for every byte value of an input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; NUM_SYMBOLS],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; NUM_SYMBOLS], total: 0 }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Counts a whole stream, `buffer_size` bytes at a time.
    pub fn from_reader<R: Read>(mut reader: R, buffer_size: usize) -> Result<Self> {
        let buffer_size = buffer_size.max(1);
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(buffer_size).map_err(HuffError::out_of_memory(buffer_size))?;
        buffer.resize(buffer_size, 0);

        let mut table = Self::new();
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => table.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(table)
    }

    pub fn update(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.counts[byte as usize] += 1;
        }
        self.total += chunk.len() as u64;
    }

    #[inline(always)]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    /// One weighted leaf per byte value, in ascending symbol order.
    pub fn into_forest(self) -> impl Iterator<Item = Node> {
        self.counts
            .into_iter()
            .enumerate()
            .map(|(s, freq)| Node::Leaf { symbol: s as u8, freq })
    }

    /// `(symbol, count)` for the whole alphabet in ascending symbol order,
    /// zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().enumerate().map(|(s, &c)| (s as u8, c))
    }
}
