//! End-to-end encode and decode.
//!
//! Container layout, all regions back to back:
//!
//! | field         | encoding                                              |
//! |---------------|-------------------------------------------------------|
//! | `symbolCount` | `i32`, little-endian                                  |
//! | `tree`        | pre-order bits, zero-padded to a byte boundary        |
//! | `payload`     | one code per input byte, zero-padded to a byte boundary |
//!
//! Tree and payload only exist when `symbolCount > 0`.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use serde::Serialize;

use crate::{
    bitstreams::{BinaryReader, BinaryWriter, DEFAULT_BUFFER_SIZE},
    command::Operation,
    error::{HuffError, Result},
    huffman::{read_tree, write_tree, CodeTable, FrequencyTable, HuffmanTree, Node},
};

pub const HEADER_BYTES: usize = 4;

/// What one encode or decode did, as reported by the command line tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscodeStats {
    pub operation: Operation,
    pub symbol_count: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub tree_bits: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
}

impl TranscodeStats {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            symbol_count: 0,
            input_bytes: 0,
            output_bytes: 0,
            tree_bits: 0,
            payload_bits: 0,
            distinct_symbols: 0,
            max_code_len: 0,
        }
    }

    /// Size of the container this run wrote or read.
    fn container_bytes(&self) -> u64 {
        let header = HEADER_BYTES as u64;
        if self.symbol_count == 0 {
            return header;
        }
        header + (self.tree_bits + 7) / 8 + (self.payload_bits + 7) / 8
    }

    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 1.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

fn symbol_count_header(total: u64) -> Result<i32> {
    i32::try_from(total).map_err(|_| {
        HuffError::wrong_input(format!("input of {total} bytes exceeds the {} byte container limit", i32::MAX))
    })
}

#[derive(Clone, Copy, Debug)]
pub struct Transcoder {
    buffer_size: usize,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self { buffer_size: DEFAULT_BUFFER_SIZE }
    }
}

impl Transcoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size: buffer_size.max(1) }
    }

    /// Encodes an in-memory input.
    pub fn encode<W: Write>(&self, data: &[u8], sink: W) -> Result<TranscodeStats> {
        let frequencies = FrequencyTable::from_bytes(data);

        self.write_container(&frequencies, sink, |table, writer| {
            for &byte in data {
                writer.push_code(table.code(byte))?;
            }
            Ok(())
        })
    }

    /// Encodes a seekable source in two passes: one to count, one to emit
    /// codes after rewinding to where the source started.
    pub fn encode_seekable<R: Read + Seek, W: Write>(&self, mut source: R, sink: W) -> Result<TranscodeStats> {
        let start = source.stream_position()?;
        let frequencies = FrequencyTable::from_reader(&mut source, self.buffer_size)?;
        source.seek(SeekFrom::Start(start))?;

        let buffer_size = self.buffer_size;
        self.write_container(&frequencies, sink, |table, writer| {
            let mut buffer = Vec::new();
            buffer.try_reserve_exact(buffer_size).map_err(HuffError::out_of_memory(buffer_size))?;
            buffer.resize(buffer_size, 0);

            let mut remaining = frequencies.total();
            while remaining > 0 {
                let n = match source.read(&mut buffer) {
                    Ok(0) => return Err(HuffError::wrong_input("source shrank between counting and encoding")),
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                let n = n.min(remaining as usize);

                for &byte in &buffer[..n] {
                    writer.push_code(table.code(byte))?;
                }
                remaining -= n as u64;
            }
            Ok(())
        })
    }

    fn write_container<W, F>(&self, frequencies: &FrequencyTable, mut sink: W, payload: F) -> Result<TranscodeStats>
    where
        W: Write,
        F: FnOnce(&CodeTable, &mut BinaryWriter<W>) -> Result<()>,
    {
        let symbol_count = symbol_count_header(frequencies.total())?;

        let mut stats = TranscodeStats::new(Operation::Compress);
        stats.input_bytes = frequencies.total();

        if frequencies.is_empty() {
            sink.write_all(&symbol_count.to_le_bytes())?;
            sink.flush()?;
            stats.output_bytes = stats.container_bytes();
            return Ok(stats);
        }

        let tree = HuffmanTree::build(frequencies)?;
        let table = CodeTable::from_tree(&tree)?;
        log::debug!("code table ready, longest code {} bits", table.max_len());

        sink.write_all(&symbol_count.to_le_bytes())?;
        let mut writer = BinaryWriter::with_buffer_size(sink, self.buffer_size)?;

        let tree_bits = write_tree(&tree, &mut writer)?;
        writer.align()?;
        log::debug!("tree of height {} serialized in {} bits", tree.height(), tree_bits);

        let payload_start = writer.written_bits;
        payload(&table, &mut writer)?;
        let payload_bits = writer.written_bits - payload_start;
        debug_assert_eq!(payload_bits as u64, table.encoded_bits(frequencies));
        writer.finish()?;

        stats.symbol_count = symbol_count as u64;
        stats.tree_bits = tree_bits as u64;
        stats.payload_bits = payload_bits as u64;
        stats.distinct_symbols = frequencies.distinct_symbols();
        stats.max_code_len = frequencies
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(symbol, _)| table.code(symbol).len())
            .max()
            .unwrap_or(0);
        stats.output_bytes = stats.container_bytes();
        log::debug!("encoded {} symbols into {} payload bits", symbol_count, payload_bits);

        Ok(stats)
    }

    /// Decodes a container, streaming the recovered bytes into `sink`.
    pub fn decode<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<TranscodeStats> {
        let mut header = [0u8; HEADER_BYTES];
        source.read_exact(&mut header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => HuffError::wrong_input("missing symbol count header"),
            _ => e.into(),
        })?;

        let symbol_count = i32::from_le_bytes(header);
        if symbol_count < 0 {
            return Err(HuffError::wrong_input(format!("negative symbol count {symbol_count}")));
        }

        let mut stats = TranscodeStats::new(Operation::Decompress);
        if symbol_count == 0 {
            stats.input_bytes = stats.container_bytes();
            return Ok(stats);
        }

        let mut reader = BinaryReader::with_buffer_size(source, self.buffer_size)?;
        let tree = read_tree(&mut reader)?;
        let tree_bits = reader.read_bits;
        reader.align();
        log::debug!("read tree of {} nodes from {} bits", tree.len(), tree_bits);

        let mut out = Vec::new();
        out.try_reserve_exact(self.buffer_size).map_err(HuffError::out_of_memory(self.buffer_size))?;

        let payload_start = reader.read_bits;
        for _ in 0..symbol_count {
            let mut id = tree.root();
            let symbol = loop {
                match *tree.node(id) {
                    Node::Leaf { symbol, .. } => break symbol,
                    Node::Internal { low, high, .. } => id = if reader.read_bit()? { high } else { low },
                }
            };

            out.push(symbol);
            if out.len() == self.buffer_size {
                sink.write_all(&out)?;
                out.clear();
            }
        }
        sink.write_all(&out)?;
        sink.flush()?;

        stats.symbol_count = symbol_count as u64;
        stats.tree_bits = tree_bits as u64;
        stats.payload_bits = (reader.read_bits - payload_start) as u64;
        stats.max_code_len = tree.height();
        stats.input_bytes = stats.container_bytes();
        stats.output_bytes = symbol_count as u64;

        Ok(stats)
    }
}

/// Encodes `data` into a fresh container.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Transcoder::new().encode(data, &mut out)?;
    Ok(out)
}

/// Decodes a whole container held in memory.
pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Transcoder::new().decode(container, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests;
