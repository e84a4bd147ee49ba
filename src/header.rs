//! Frequency header: `(count, byte)` pairs for every present byte in
//! ascending order, closed by a single `0x00` sentinel.

use std::io::{Read, Write};

use crate::error::{HuffmanError, Phase, Result};
use crate::frequency::FrequencyTable;

/// Closes the pair list. Never a valid count since only present bytes are
/// written.
pub const END_OF_COUNTS: u8 = 0;

/// Write the header and return the number of bytes written.
pub fn write_header<W: Write>(writer: &mut W, frequencies: &FrequencyTable) -> Result<usize> {
    let mut bytes = Vec::with_capacity(frequencies.distinct_symbols() * 2 + 1);
    for (byte, count) in frequencies.iter_present() {
        // scaling keeps counts in 1..=255
        debug_assert!((1..=255).contains(&count));
        bytes.push(count as u8);
        bytes.push(byte);
    }
    bytes.push(END_OF_COUNTS);

    writer
        .write_all(&bytes)
        .map_err(|e| HuffmanError::io(Phase::HeaderWrite, e))?;
    Ok(bytes.len())
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader
        .read_exact(&mut byte)
        .map_err(|e| HuffmanError::io(Phase::HeaderRead, e))?;
    Ok(byte[0])
}

/// Read pairs until the sentinel. Returns the rebuilt table and the header
/// length in bytes. The reader is left on the first payload byte.
pub fn read_header<R: Read>(reader: &mut R) -> Result<(FrequencyTable, usize)> {
    let mut frequencies = FrequencyTable::new();
    let mut offset = 0usize;
    let mut previous: Option<u8> = None;

    loop {
        let count = read_byte(reader)?;
        offset += 1;
        if count == END_OF_COUNTS {
            break;
        }
        let symbol = read_byte(reader)?;
        if previous.is_some_and(|p| symbol <= p) {
            return Err(HuffmanError::MalformedHeader { offset, symbol });
        }
        offset += 1;
        previous = Some(symbol);
        frequencies.set(symbol, count);
    }

    Ok((frequencies, offset))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_aaab_header_bytes() {
        let table = FrequencyTable::from_bytes(b"AAAB");
        let mut out = Vec::new();
        let len = write_header(&mut out, &table).unwrap();
        assert_eq!(out, vec![3, b'A', 1, b'B', 0]);
        assert_eq!(len, 5);
    }

    #[test]
    fn test_empty_header_is_just_the_sentinel() {
        let mut out = Vec::new();
        write_header(&mut out, &FrequencyTable::new()).unwrap();
        assert_eq!(out, vec![END_OF_COUNTS]);
    }

    #[test]
    fn test_read_back_and_stop_at_sentinel() {
        let table = FrequencyTable::from_bytes(b"hello world");
        let mut out = Vec::new();
        write_header(&mut out, &table).unwrap();
        out.extend_from_slice(&[0xAA, 0xBB]);

        let mut cursor = Cursor::new(out);
        let (read, len) = read_header(&mut cursor).unwrap();
        assert_eq!(read.iter_present().collect::<Vec<_>>(), table.iter_present().collect::<Vec<_>>());
        assert_eq!(len, table.distinct_symbols() * 2 + 1);
        assert_eq!(cursor.position() as usize, len);
    }

    #[test]
    fn test_header_counts_fit_a_byte() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 3) as u8).collect();
        let table = FrequencyTable::from_bytes(&data);
        let mut out = Vec::new();
        write_header(&mut out, &table).unwrap();
        for pair in out[..out.len() - 1].chunks(2) {
            assert!(pair[0] >= 1);
            assert_eq!(u32::from(pair[0]), table.get(pair[1]));
        }
    }

    #[test]
    fn test_missing_sentinel_is_truncated() {
        let err = read_header(&mut Cursor::new(vec![3, b'A', 1])).unwrap_err();
        assert!(matches!(err, HuffmanError::Truncated { phase: Phase::HeaderRead }));

        let err = read_header(&mut Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, HuffmanError::Truncated { phase: Phase::HeaderRead }));
    }

    #[test]
    fn test_out_of_order_symbols_are_rejected() {
        let err = read_header(&mut Cursor::new(vec![1, b'b', 1, b'a', 0])).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedHeader { offset: 3, symbol: b'a' }));
    }
}
