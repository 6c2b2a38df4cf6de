//! nes-xm: pattern-level XM (Extended Module) reader and writer
//!
//! Reads what a pattern compiler needs from a FastTracker 2 module: the song
//! header, the order table and unpacked `[row][channel]` note grids.
//! Instruments and samples are never decoded.
//!
//! ```ignore
//! let module = nes_xm::parse_xm(&std::fs::read("song.xm")?)?;
//! for (position, pattern) in module.order_table.iter().enumerate() {
//!     println!("{position}: pattern {pattern}");
//! }
//! ```
//!
//! Format reference: `xm-form.txt` (XM v0104), as shipped with MilkyTracker.

mod error;
mod module;
mod parser;

pub use error::XmError;
pub use module::{XmModule, XmNote, XmPattern};
pub use parser::{parse_xm, write_xm};

/// File signature
pub const XM_MAGIC: &[u8; 17] = b"Extended Module: ";

/// The only format version accepted
pub const XM_VERSION: u16 = 0x0104;

pub const MAX_CHANNELS: u8 = 32;
pub const MAX_PATTERNS: u16 = 256;
pub const MAX_PATTERN_ROWS: u16 = 256;

/// Note column value for key-off
pub const NOTE_OFF: u8 = 97;

/// Effect column numbers
pub mod effects {
    pub const ARPEGGIO: u8 = 0x00;
    pub const PORTA_UP: u8 = 0x01;
    pub const PORTA_DOWN: u8 = 0x02;
    pub const TONE_PORTA: u8 = 0x03;
    pub const VIBRATO: u8 = 0x04;
    /// 5xy: tone portamento with volume slide
    pub const TONE_PORTA_VOL_SLIDE: u8 = 0x05;
    /// Fxx: below 0x20 sets speed, otherwise BPM
    pub const SET_SPEED: u8 = 0x0F;
}
