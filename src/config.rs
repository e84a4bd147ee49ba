use crate::code_table::MAX_CODE_BITS;
use crate::symbol::EofMode;

/// Settings shared by the compressor and expander. Both sides of a stream
/// must use the same `eof_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub eof_mode: EofMode,
    /// Longest code the compressor accepts before failing with
    /// `UnsupportedDistribution`.
    pub max_code_len: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            eof_mode: EofMode::Extended,
            max_code_len: MAX_CODE_BITS,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses byte 254 as the end-of-stream symbol, collision included.
    /// Only the symbol choice is legacy: ties are still broken by insertion
    /// order, so streams from other encoders are not guaranteed to decode.
    pub fn legacy() -> Self {
        Self::default().with_eof_mode(EofMode::Legacy)
    }

    pub fn with_eof_mode(mut self, eof_mode: EofMode) -> Self {
        self.eof_mode = eof_mode;
        self
    }

    /// Clamped to `1..=64`.
    pub fn with_max_code_len(mut self, max_code_len: u8) -> Self {
        self.max_code_len = max_code_len.clamp(1, MAX_CODE_BITS);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.eof_mode, EofMode::Extended);
        assert_eq!(config.max_code_len, 64);
        assert_eq!(CodecConfig::legacy().eof_mode, EofMode::Legacy);
    }

    #[test]
    fn test_max_code_len_is_clamped() {
        assert_eq!(CodecConfig::new().with_max_code_len(0).max_code_len, 1);
        assert_eq!(CodecConfig::new().with_max_code_len(200).max_code_len, 64);
        assert_eq!(CodecConfig::new().with_max_code_len(12).max_code_len, 12);
    }
}
