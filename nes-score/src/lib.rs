//! nes-score: compiles tracker songs into NES sound-driver byte code
//!
//! The driver plays five hardware channels (two pulse, triangle, noise and
//! sample playback). Each channel gets its own deduplicated set of patterns,
//! encoded as compact row-flag groups, plus an order list that loops back to
//! its own start. The result is written as assembler source.
//!
//! # Usage
//!
//! ```ignore
//! use nes_score::{ConvertOptions, convert_xm_bytes, asm};
//!
//! let data = std::fs::read("song.xm")?;
//! let score = convert_xm_bytes(&data, &ConvertOptions::with_prefix("song_"))?;
//! asm::write_asm(&score, &mut std::io::stdout())?;
//! ```
//!
//! # Output layout
//!
//! ```text
//! <prefix>chn<c>_ptn<i>:   encoded pattern blocks
//! <prefix>pattern_table:   one address per unique pattern
//! <prefix>song:            5 header slots, table address, order lists
//! ```

pub mod asm;
pub mod opcodes;

mod assembler;
mod channel;
mod dedup;
mod encoder;
mod error;
mod options;
mod song;

pub use assembler::{CompiledChannel, HeaderSlot, NesScore, compile};
pub use channel::{ChannelKind, ChannelMask, ChannelMaskError, NUM_HW_CHANNELS};
pub use dedup::{UniquePatterns, find_unique_patterns, map_order_table};
pub use encoder::{EncoderState, encode_pattern};
pub use error::ScoreError;
pub use options::ConvertOptions;
pub use song::{Pattern, Slot, Song};

/// Flat pattern indices must stay below the order-loop marker
pub const MAX_PATTERN_TABLE_ENTRIES: usize = opcodes::ORDER_LOOP as usize;

/// Validate and compile a song
pub fn convert(song: &Song, options: &ConvertOptions) -> Result<NesScore, ScoreError> {
    song.validate()?;
    compile(song, options)
}

/// Parse an XM file and compile it
pub fn convert_xm_bytes(data: &[u8], options: &ConvertOptions) -> Result<NesScore, ScoreError> {
    let module = nes_xm::parse_xm(data)?;
    convert(&Song::from(&module), options)
}
