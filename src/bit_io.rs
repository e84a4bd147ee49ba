//! MSB-first bit streams over byte readers and writers.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Phase, Result};

const FIRST_BIT: u8 = 0x80;

/// Packs bits into bytes, high bit first, and writes each byte as soon as it
/// fills. Call [`BitWriter::finish`] to emit the last partial byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    rack: u8,
    mask: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            rack: 0,
            mask: FIRST_BIT,
            bits_written: 0,
        }
    }

    fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.rack |= self.mask;
        }
        self.mask >>= 1;
        self.bits_written += 1;

        if self.mask == 0 {
            self.inner.write_all(&[self.rack])?;
            self.rack = 0;
            self.mask = FIRST_BIT;
        }
        Ok(())
    }

    /// Write the low `bit_length` bits of `code`, most significant first.
    pub fn write_bits(&mut self, code: u64, bit_length: u8) -> Result<()> {
        debug_assert!(bit_length <= 64);
        for bit_pos in (0..bit_length).rev() {
            let bit = (code >> bit_pos) & 1;
            self.push_bit(bit != 0)
                .map_err(|e| HuffmanError::io(Phase::Encode, e))?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// True while the rack holds bits that have not reached the writer.
    pub fn has_partial_byte(&self) -> bool {
        self.mask != FIRST_BIT
    }

    /// Write the partial byte (zero padded), flush, and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        if self.has_partial_byte() {
            self.inner
                .write_all(&[self.rack])
                .map_err(|e| HuffmanError::io(Phase::Flush, e))?;
            self.rack = 0;
            self.mask = FIRST_BIT;
        }
        self.inner
            .flush()
            .map_err(|e| HuffmanError::io(Phase::Flush, e))?;
        Ok(self.inner)
    }
}

/// Reads bits high bit first, pulling a new byte whenever the current one
/// is used up.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    rack: u8,
    mask: u8,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            rack: 0,
            mask: 0,
            bytes_read: 0,
        }
    }

    /// Next bit, or `Truncated` once the underlying reader is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.mask == 0 {
            let mut byte = [0u8; 1];
            self.inner
                .read_exact(&mut byte)
                .map_err(|e| HuffmanError::io(Phase::Decode, e))?;
            self.rack = byte[0];
            self.mask = FIRST_BIT;
            self.bytes_read += 1;
        }
        let bit = self.rack & self.mask != 0;
        self.mask >>= 1;
        Ok(bit)
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
