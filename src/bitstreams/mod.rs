use std::io::{ErrorKind, Read, Write};

use crate::{
    error::{HuffError, Result},
    huffman::Code,
};

pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

#[inline(always)]
fn mask(len: usize) -> u64 {
    if len >= 64 { u64::MAX } else { (1 << len) - 1 }
}

/// Packs bits MSB-first into bytes and hands complete bytes to the sink.
pub struct BinaryWriter<W: Write> {
    sink: W,
    os: Vec<u8>,
    buffer_size: usize,
    pub written_bits: usize,
    current: u8,
    free: usize,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(sink: W) -> Result<Self> {
        Self::with_buffer_size(sink, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(sink: W, buffer_size: usize) -> Result<Self> {
        let buffer_size = buffer_size.max(1);
        let mut os = Vec::new();
        os.try_reserve_exact(buffer_size).map_err(HuffError::out_of_memory(buffer_size))?;

        Ok(Self {
            sink,
            os,
            buffer_size,
            written_bits: 0,
            current: 0,
            free: 8,
        })
    }

    #[inline(always)]
    fn write(&mut self, b: u8) -> Result<()> {
        self.os.push(b);
        if self.os.len() >= self.buffer_size {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<()> {
        self.sink.write_all(&self.os)?;
        self.os.clear();
        Ok(())
    }

    /// `len` must not exceed the free bits of the current byte.
    #[inline(always)]
    fn write_in_current(&mut self, b: u64, len: usize) -> Result<()> {
        debug_assert!(len <= self.free);
        self.free -= len;
        self.current |= ((b & mask(len)) as u8) << self.free;
        self.written_bits += len;

        if self.free == 0 {
            let byte = self.current;
            self.write(byte)?;
            self.free = 8;
            self.current = 0;
        }

        Ok(())
    }

    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) -> Result<()> {
        self.write_in_current(bit as u64, 1)
    }

    /// Appends the lowest `len` bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u64, len: usize) -> Result<()> {
        assert!(len <= 64, "Cannot write {} bits from an integer", len);

        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(self.free);
            self.write_in_current(x >> (remaining - take), take)?;
            remaining -= take;
        }

        Ok(())
    }

    /// Appends the first `len` bits of an MSB-first packed byte slice.
    pub fn push_packed(&mut self, bits: &[u8], len: usize) -> Result<()> {
        assert!(len <= bits.len() * 8, "Packed slice holds fewer than {} bits", len);

        let full = len / 8;
        for &byte in &bits[..full] {
            self.push_bits(byte as u64, 8)?;
        }

        let rem = len % 8;
        if rem != 0 {
            self.push_bits((bits[full] >> (8 - rem)) as u64, rem)?;
        }

        Ok(())
    }

    #[inline(always)]
    pub fn push_code(&mut self, code: &Code) -> Result<()> {
        self.push_packed(code.packed(), code.len())
    }

    pub fn is_aligned(&self) -> bool {
        self.free == 8
    }

    /// Zero-pads the current byte up to the next boundary.
    pub fn align(&mut self) -> Result<()> {
        if !self.is_aligned() {
            self.write_in_current(0, self.free)?;
        }
        Ok(())
    }

    /// Pads the last partial byte, flushes everything and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        self.align()?;
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Pulls bytes from a source and exposes them one bit at a time, MSB first.
pub struct BinaryReader<R: Read> {
    is: R,
    buffer: Vec<u8>,
    pos: usize,
    avail: usize,
    pub read_bits: usize,
    current: u8,
    fill: usize,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(input_stream: R) -> Result<Self> {
        Self::with_buffer_size(input_stream, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(input_stream: R, buffer_size: usize) -> Result<Self> {
        let buffer_size = buffer_size.max(1);
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(buffer_size).map_err(HuffError::out_of_memory(buffer_size))?;
        buffer.resize(buffer_size, 0);

        Ok(Self {
            is: input_stream,
            buffer,
            pos: 0,
            avail: 0,
            read_bits: 0,
            current: 0,
            fill: 0,
        })
    }

    /// Reads the next byte from the stream.
    fn read(&mut self) -> Result<u8> {
        if self.pos == self.avail {
            self.pos = 0;
            self.avail = loop {
                match self.is.read(&mut self.buffer) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };

            if self.avail == 0 {
                return Err(HuffError::wrong_input("bitstream ended prematurely"));
            }
        }

        self.pos += 1;
        Ok(self.buffer[self.pos - 1])
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.fill == 0 {
            self.current = self.read()?;
            self.fill = 8;
        }

        self.fill -= 1;
        self.read_bits += 1;
        Ok((self.current >> self.fill) & 1 == 1)
    }

    pub fn read_int(&mut self, len: usize) -> Result<u64> {
        assert!(len <= 64, "Cannot read {} bits into an integer", len);

        let mut x = 0u64;
        let mut remaining = len;
        while remaining > 0 {
            if self.fill == 0 {
                self.current = self.read()?;
                self.fill = 8;
            }

            let take = remaining.min(self.fill);
            self.fill -= take;
            let chunk = (self.current as u64 >> self.fill) & mask(take);
            x = (x << take) | chunk;
            self.read_bits += take;
            remaining -= take;
        }

        Ok(x)
    }

    /// Drops whatever is left of the current byte.
    pub fn align(&mut self) {
        self.read_bits += self.fill;
        self.fill = 0;
    }
}

#[cfg(test)]
mod tests;
