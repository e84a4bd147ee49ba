//! Alphabet definitions shared by the encoder and decoder.

/// A coded symbol: a data byte (0..=255) or the end-of-stream marker.
pub type Symbol = u16;

/// Number of distinct byte values that can appear in the input.
pub const BYTE_SYMBOLS: usize = 256;

/// Data bytes plus one out-of-band end-of-stream symbol.
pub const ALPHABET_SIZE: usize = BYTE_SYMBOLS + 1;

/// End-of-stream symbol in the widened 257-symbol alphabet.
pub const EOF_SYMBOL: Symbol = 256;

/// End-of-stream symbol used by the legacy byte-only format.
/// It shares its value with data byte 254.
pub const LEGACY_EOF_SYMBOL: Symbol = 254;

/// Which value the end-of-stream leaf carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofMode {
    /// EOF is its own symbol (256); every byte value round-trips.
    #[default]
    Extended,
    /// EOF reuses byte value 254, so expansion stops at the first 254 in
    /// the data. This reproduces the legacy symbol choice only; it does not
    /// make the stream interchangeable with other legacy encoders.
    Legacy,
}

impl EofMode {
    pub fn symbol(self) -> Symbol {
        match self {
            EofMode::Extended => EOF_SYMBOL,
            EofMode::Legacy => LEGACY_EOF_SYMBOL,
        }
    }

    pub fn is_eof(self, symbol: Symbol) -> bool {
        symbol == self.symbol()
    }
}
