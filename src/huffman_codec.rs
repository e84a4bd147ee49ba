use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Phase, Result};
use crate::frequency::FrequencyTable;
use crate::header::{read_header, write_header};
use crate::hufftree::HuffmanTree;
use crate::symbol::{EofMode, LEGACY_EOF_SYMBOL};

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressReport {
    pub input_bytes: u64,
    pub header_bytes: u64,
    /// Payload bits before padding, end-of-stream code included.
    pub payload_bits: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    pub scale_events: usize,
}

impl CompressReport {
    /// Output size over input size; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Header plus every payload byte the decoder pulled.
    pub input_bytes: u64,
    pub output_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    pub fn new(config: CodecConfig) -> Self {
        Compressor { config }
    }

    /// Compress `source` into `sink`.
    ///
    /// `source` is read twice, once to count and once to encode, so it must
    /// be seekable. Codes are derived before anything is written, so a
    /// distribution that exceeds the code length limit leaves `sink` untouched.
    pub fn compress<R, W>(&self, source: &mut R, sink: &mut W) -> Result<CompressReport>
    where
        R: Read + Seek,
        W: Write,
    {
        let frequencies =
            FrequencyTable::count(source).map_err(|e| HuffmanError::io(Phase::Count, e))?;
        source
            .rewind()
            .map_err(|e| HuffmanError::io(Phase::Rewind, e))?;

        let eof = self.config.eof_mode;
        if eof == EofMode::Legacy && frequencies.get(LEGACY_EOF_SYMBOL as u8) > 0 {
            warn!("input contains byte 254, which legacy mode also uses as end-of-stream; expansion will stop there");
        }

        let codes = {
            let tree = HuffmanTree::from_frequencies(&frequencies, eof)?;
            CodeTable::derive(&tree, self.config.max_code_len)?
        };

        let header_bytes = write_header(sink, &frequencies)?;

        let mut bits = BitWriter::new(&mut *sink);
        let mut input_bytes = 0u64;
        let mut buf = [0u8; 8192];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HuffmanError::io(Phase::Encode, e)),
            };
            for &byte in &buf[..n] {
                let code = codes.get(u16::from(byte)).ok_or_else(|| {
                    // the source changed between the two passes
                    HuffmanError::io(
                        Phase::Encode,
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("Byte {} not in encode table", byte),
                        ),
                    )
                })?;
                bits.write_bits(code.bits, code.bit_length)?;
            }
            input_bytes += n as u64;
        }

        let eof_code = codes.get(eof.symbol()).ok_or_else(|| {
            HuffmanError::io(
                Phase::CodeDerive,
                io::Error::new(io::ErrorKind::InvalidData, "end-of-stream symbol has no code"),
            )
        })?;
        bits.write_bits(eof_code.bits, eof_code.bit_length)?;

        let payload_bits = bits.bits_written();
        bits.finish()?;

        let report = CompressReport {
            input_bytes,
            header_bytes: header_bytes as u64,
            payload_bits,
            output_bytes: header_bytes as u64 + payload_bits.div_ceil(8),
            distinct_symbols: frequencies.distinct_symbols(),
            scale_events: frequencies.scale_events(),
        };
        debug!(
            input = report.input_bytes,
            output = report.output_bytes,
            header = report.header_bytes,
            payload_bits = report.payload_bits,
            symbols = report.distinct_symbols,
            scaled = report.scale_events,
            longest_code = codes.max_length(),
            "compressed"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Expander {
    config: CodecConfig,
}

impl Expander {
    pub fn new(config: CodecConfig) -> Self {
        Expander { config }
    }

    /// Decode a whole stream into memory. Nothing is returned unless the
    /// end-of-stream symbol was reached.
    pub fn expand_to_vec<R: Read>(&self, mut source: R) -> Result<(Vec<u8>, ExpandReport)> {
        let (frequencies, header_bytes) = read_header(&mut source)?;
        let tree = HuffmanTree::from_frequencies(&frequencies, self.config.eof_mode)?;

        let mut bits = BitReader::new(source);
        let mut result = Vec::new();
        loop {
            let symbol = tree.decode_one(&mut bits)?;
            if self.config.eof_mode.is_eof(symbol) {
                break;
            }
            // every non-EOF leaf is a byte value
            result.push(symbol as u8);
        }

        let report = ExpandReport {
            input_bytes: header_bytes as u64 + bits.bytes_read(),
            output_bytes: result.len() as u64,
        };
        debug!(
            input = report.input_bytes,
            output = report.output_bytes,
            symbols = frequencies.distinct_symbols(),
            "expanded"
        );
        Ok((result, report))
    }

    /// Decode `source` and write the bytes to `sink` once decoding has
    /// succeeded.
    pub fn expand<R, W>(&self, source: R, sink: &mut W) -> Result<ExpandReport>
    where
        R: Read,
        W: Write,
    {
        let (data, report) = self.expand_to_vec(source)?;
        sink.write_all(&data)
            .and_then(|_| sink.flush())
            .map_err(|e| HuffmanError::io(Phase::Output, e))?;
        Ok(report)
    }
}

pub fn compress_bytes(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Compressor::new(*config).compress(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

pub fn expand_bytes(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let (out, _) = Expander::new(*config).expand_to_vec(data)?;
    Ok(out)
}

/// Rejects a `dst` that resolves to the same file as `src`, before either
/// is opened for writing.
fn ensure_distinct(src: &Path, dst: &Path) -> Result<()> {
    let same = match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(HuffmanError::open(
            dst,
            io::Error::new(io::ErrorKind::InvalidInput, "destination is the source file"),
        ));
    }
    Ok(())
}

/// Compress the file at `src` into `dst`. A partially written `dst` is
/// removed if the run fails.
pub fn compress_file(src: &Path, dst: &Path, config: &CodecConfig) -> Result<CompressReport> {
    ensure_distinct(src, dst)?;
    let input = File::open(src).map_err(|e| HuffmanError::open(src, e))?;
    let output = File::create(dst).map_err(|e| HuffmanError::open(dst, e))?;

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let result = Compressor::new(*config).compress(&mut reader, &mut writer);
    drop(writer);

    if let Err(e) = &result {
        warn!(path = %dst.display(), error = %e, "compression failed, removing output");
        let _ = fs::remove_file(dst);
    }
    result
}

/// Expand the file at `src` into `dst`. `dst` is only created once the
/// whole stream has decoded.
pub fn expand_file(src: &Path, dst: &Path, config: &CodecConfig) -> Result<ExpandReport> {
    ensure_distinct(src, dst)?;
    let input = File::open(src).map_err(|e| HuffmanError::open(src, e))?;
    let (data, report) = Expander::new(*config).expand_to_vec(BufReader::new(input))?;

    let mut output = File::create(dst).map_err(|e| HuffmanError::open(dst, e))?;
    output
        .write_all(&data)
        .and_then(|_| output.sync_all())
        .map_err(|e| HuffmanError::io(Phase::Output, e))?;
    Ok(report)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_aaab_stream_layout() {
        let compressed = compress_bytes(b"AAAB", &CodecConfig::default()).unwrap();
        // header, then A A A B EOF = 1 1 1 00 01 -> 1110 0010
        assert_eq!(compressed, vec![3, b'A', 1, b'B', 0, 0b1110_0010]);
        assert_eq!(expand_bytes(&compressed, &CodecConfig::default()).unwrap(), b"AAAB");
    }

    #[test]
    fn test_empty_input() {
        let compressed = compress_bytes(b"", &CodecConfig::default()).unwrap();
        assert_eq!(compressed, vec![0]);
        assert!(expand_bytes(&compressed, &CodecConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_report_counts() {
        let data = b"abracadabra".to_vec();
        let mut out = Vec::new();
        let report = Compressor::default()
            .compress(&mut Cursor::new(&data), &mut out)
            .unwrap();
        assert_eq!(report.input_bytes, data.len() as u64);
        assert_eq!(report.output_bytes, out.len() as u64);
        assert_eq!(report.distinct_symbols, 5);
        assert_eq!(report.header_bytes, 11);

        let mut restored = Vec::new();
        let expand = Expander::default().expand(Cursor::new(&out), &mut restored).unwrap();
        assert_eq!(restored, data);
        assert_eq!(expand.input_bytes, out.len() as u64);
        assert_eq!(expand.output_bytes, data.len() as u64);
    }

    #[test]
    fn test_truncated_payload_fails_without_output() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 17) as u8).collect();
        let compressed = compress_bytes(&data, &CodecConfig::default()).unwrap();
        let cut = &compressed[..compressed.len() - 10];

        let mut sink = Vec::new();
        let err = Expander::default().expand(cut, &mut sink).unwrap_err();
        assert!(matches!(err, HuffmanError::Truncated { phase: Phase::Decode }));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_code_length_limit_leaves_sink_untouched() {
        let data: Vec<u8> = (0..=255u8).collect();
        let config = CodecConfig::default().with_max_code_len(4);
        let mut out = Vec::new();
        let err = Compressor::new(config)
            .compress(&mut Cursor::new(&data), &mut out)
            .unwrap_err();
        assert!(matches!(err, HuffmanError::UnsupportedDistribution { limit: 4, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_legacy_mode_stops_at_254() {
        let data = [1u8, 2, 254, 3, 4];
        let config = CodecConfig::legacy();
        let compressed = compress_bytes(&data, &config).unwrap();
        assert_eq!(expand_bytes(&compressed, &config).unwrap(), vec![1, 2]);

        let extended = compress_bytes(&data, &CodecConfig::default()).unwrap();
        assert_eq!(expand_bytes(&extended, &CodecConfig::default()).unwrap(), data);
    }

    #[test]
    fn test_legacy_abcd_stream_bytes() {
        // C=00 D=01 EOF=10 A=110 B=111
        let compressed = compress_bytes(b"ABCD", &CodecConfig::legacy()).unwrap();
        assert_eq!(
            compressed,
            vec![1, b'A', 1, b'B', 1, b'C', 1, b'D', 0, 0b1101_1100, 0b0110_0000]
        );
        assert_eq!(expand_bytes(&compressed, &CodecConfig::legacy()).unwrap(), b"ABCD");
    }

    #[test]
    fn test_modes_agree_without_254() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(
            compress_bytes(data, &CodecConfig::legacy()).unwrap(),
            compress_bytes(data, &CodecConfig::default()).unwrap()
        );
    }
}
