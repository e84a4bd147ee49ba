//! Order-0 frequency counting with byte-range scaling.

use std::io::{self, Read};

use tracing::trace;

use crate::symbol::BYTE_SYMBOLS;

/// Smallest count that no longer fits in the one-byte header field.
const OVERFLOW_COUNT: u32 = 256;

/// Per-byte occurrence counts. Every count stays within `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; BYTE_SYMBOLS],
    scale_events: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable {
            counts: [0; BYTE_SYMBOLS],
            scale_events: 0,
        }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in bytes {
            table.record(byte);
        }
        table
    }

    /// Count every byte of `reader` until it is exhausted.
    ///
    /// The reader is left at its end; rewinding for the encode pass is the
    /// caller's job.
    pub fn count<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            for &byte in &buf[..n] {
                table.record(byte);
            }
        }
        Ok(table)
    }

    pub fn record(&mut self, byte: u8) {
        let slot = &mut self.counts[byte as usize];
        *slot += 1;
        if *slot == OVERFLOW_COUNT {
            self.scale();
        }
    }

    /// Halve every nonzero count, rounding up so no symbol drops to zero.
    fn scale(&mut self) {
        for count in self.counts.iter_mut().filter(|c| **c > 0) {
            *count = (*count + 1) / 2;
        }
        self.scale_events += 1;
        trace!(event = self.scale_events, "frequency counts scaled");
    }

    /// Rebuild a table from header entries.
    pub(crate) fn set(&mut self, byte: u8, count: u8) {
        self.counts[byte as usize] = u32::from(count);
    }

    pub fn get(&self, byte: u8) -> u32 {
        self.counts[byte as usize]
    }

    /// `(byte, count)` for every present byte, ascending by byte value.
    pub fn iter_present(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn scale_events(&self) -> usize {
        self.scale_events
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_simple_counts() {
        let table = FrequencyTable::from_bytes(b"AAAB");
        assert_eq!(table.get(b'A'), 3);
        assert_eq!(table.get(b'B'), 1);
        assert_eq!(table.distinct_symbols(), 2);
        assert_eq!(table.scale_events(), 0);
    }

    #[test]
    fn test_scaling_fires_at_256() {
        let table = FrequencyTable::from_bytes(&[5u8; 255]);
        assert_eq!(table.get(5), 255);
        assert_eq!(table.scale_events(), 0);

        let table = FrequencyTable::from_bytes(&[5u8; 256]);
        assert_eq!(table.get(5), 128);
        assert_eq!(table.scale_events(), 1);
    }

    #[test]
    fn test_300_identical_bytes() {
        // 256 -> 128 on overflow, then 44 more
        let table = FrequencyTable::from_bytes(&[5u8; 300]);
        assert_eq!(table.get(5), 172);
        assert_eq!(table.scale_events(), 1);
    }

    #[test]
    fn test_scaling_keeps_rare_symbols() {
        let mut data = vec![b'x'];
        data.extend(std::iter::repeat(b'y').take(1000));
        let table = FrequencyTable::from_bytes(&data);
        assert_eq!(table.get(b'x'), 1);
        assert!(table.get(b'y') <= 255);
        assert!(table.scale_events() >= 3);
    }

    #[test]
    fn test_count_from_reader_matches_slice() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let from_reader = FrequencyTable::count(&mut Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn test_iter_present_is_ascending() {
        let table = FrequencyTable::from_bytes(b"zay");
        let bytes: Vec<u8> = table.iter_present().map(|(b, _)| b).collect();
        assert_eq!(bytes, vec![b'a', b'y', b'z']);
    }
}
