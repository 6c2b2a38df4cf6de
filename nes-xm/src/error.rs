//! XM reading errors

/// Why an XM file could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmError {
    #[error("File too small to contain XM header")]
    TooSmall,

    #[error("Invalid XM magic string")]
    InvalidMagic,

    #[error("Unsupported XM version: 0x{0:04X}")]
    UnsupportedVersion(u16),

    #[error("Too many channels: {0} (max {max})", max = crate::MAX_CHANNELS)]
    TooManyChannels(u16),

    #[error("Too many patterns: {0} (max {max})", max = crate::MAX_PATTERNS)]
    TooManyPatterns(u16),

    /// Pattern header or packed data is malformed or truncated
    #[error("Invalid pattern data at index {0}")]
    InvalidPattern(u16),

    #[error("Unexpected end of file")]
    UnexpectedEof,
}
