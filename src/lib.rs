//! # static_huffman
//!
//! Order-0 static Huffman compression of byte streams.
//!
//! A compressed stream is a frequency header (`count`, `byte` pairs closed
//! by a `0x00` byte) followed by the MSB-first Huffman codes of every input
//! byte and of an end-of-stream symbol, zero padded to a whole byte.
//!
//! ## Quick Start
//!
//! ```rust
//! use static_huffman::{compress_bytes, expand_bytes, CodecConfig};
//!
//! let config = CodecConfig::default();
//! let packed = compress_bytes(b"AAAB", &config)?;
//! assert_eq!(packed, vec![3, b'A', 1, b'B', 0, 0b1110_0010]);
//! assert_eq!(expand_bytes(&packed, &config)?, b"AAAB");
//! # Ok::<(), static_huffman::HuffmanError>(())
//! ```

pub mod bit_io;
pub mod code_table;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman_codec;
pub mod hufftree;
pub mod symbol;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use code_table::{Code, CodeTable};
pub use config::CodecConfig;
pub use error::{HuffmanError, Phase, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{
    compress_bytes, compress_file, expand_bytes, expand_file, CompressReport, Compressor,
    ExpandReport, Expander,
};
pub use hufftree::{HuffNode, HuffmanTree};
pub use min_heap::HeapErr;
pub use symbol::{EofMode, Symbol};
