//! Error type for compression and expansion runs.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::min_heap::HeapErr;
use crate::symbol::Symbol;

/// The step of a run an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Count,
    Rewind,
    HeaderWrite,
    HeaderRead,
    TreeBuild,
    CodeDerive,
    Encode,
    Decode,
    Flush,
    Output,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Count => "frequency count",
            Phase::Rewind => "source rewind",
            Phase::HeaderWrite => "header write",
            Phase::HeaderRead => "header read",
            Phase::TreeBuild => "tree build",
            Phase::CodeDerive => "code derivation",
            Phase::Encode => "bit encode",
            Phase::Decode => "bit decode",
            Phase::Flush => "flush",
            Phase::Output => "output write",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// A file could not be opened or created.
    #[error("cannot open {}: {}", path.display(), source)]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O failure during {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    /// The source ran out before the header sentinel, a leaf, or the
    /// end-of-stream symbol was reached.
    #[error("stream truncated during {phase}")]
    Truncated { phase: Phase },

    #[error("malformed header at byte {offset}: symbol {symbol} is out of order")]
    MalformedHeader { offset: usize, symbol: u8 },

    #[error("code for symbol {symbol} needs {length} bits, limit is {limit}")]
    UnsupportedDistribution {
        symbol: Symbol,
        length: usize,
        limit: u8,
    },

    /// Two subtree weights sum past `u32::MAX`.
    #[error("node weight overflow during tree build")]
    WeightOverflow,

    #[error("heap error during tree build: {0}")]
    Heap(#[from] HeapErr),
}

impl HuffmanError {
    /// Wrap an I/O error, turning an unexpected EOF into `Truncated`.
    pub fn io(phase: Phase, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            HuffmanError::Truncated { phase }
        } else {
            HuffmanError::Io { phase, source }
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::Open {
            path: path.into(),
            source,
        }
    }

    /// The phase the error was raised in, when it carries one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            HuffmanError::Io { phase, .. } | HuffmanError::Truncated { phase } => Some(*phase),
            HuffmanError::MalformedHeader { .. } => Some(Phase::HeaderRead),
            HuffmanError::UnsupportedDistribution { .. } => Some(Phase::CodeDerive),
            HuffmanError::Heap(_) | HuffmanError::WeightOverflow => Some(Phase::TreeBuild),
            HuffmanError::Open { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unexpected_eof_becomes_truncated() {
        let err = HuffmanError::io(
            Phase::HeaderRead,
            io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(matches!(err, HuffmanError::Truncated { phase: Phase::HeaderRead }));
        assert_eq!(err.to_string(), "stream truncated during header read");
    }

    #[test]
    fn test_io_error_keeps_phase() {
        let err = HuffmanError::io(Phase::Flush, io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.phase(), Some(Phase::Flush));
        assert!(err.to_string().contains("flush"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_open_error_names_path() {
        let err = HuffmanError::open("/no/such/file", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/no/such/file"));
        assert_eq!(err.phase(), None);
    }
}
