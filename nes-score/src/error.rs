//! Compilation error types

use nes_xm::XmError;

/// Fatal conditions that abort compilation
///
/// Everything recoverable (unsupported effects, content on channels the
/// hardware doesn't have) is logged and dropped instead.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("Pattern {pattern} has {rows} rows (must be a multiple of 8)")]
    RowCountNotMultipleOfEight { pattern: usize, rows: u16 },

    #[error(
        "Order position {order} (pattern {pattern}) matches no unique pattern on channel {channel}"
    )]
    UnmatchedOrderEntry {
        channel: u8,
        order: usize,
        pattern: usize,
    },

    #[error("Order position {order} references pattern {pattern}, but the song has {count} patterns")]
    OrderOutOfRange {
        order: usize,
        pattern: usize,
        count: usize,
    },

    #[error("Pattern table has {0} entries; order bytes can address at most {max}", max = crate::MAX_PATTERN_TABLE_ENTRIES)]
    PatternTableOverflow(usize),

    #[error("Order data offset {0} does not fit in a byte")]
    OrderDataOverflow(usize),

    #[error("Failed to read module: {0}")]
    Xm(#[from] XmError),
}
