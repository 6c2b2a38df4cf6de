//! XM reading and writing
//!
//! Only the header, order table and patterns are handled in either direction.

mod read;
mod write;


pub use read::parse_xm;
pub use write::write_xm;

/// Lead-byte bits of a packed pattern note
pub(crate) mod packing {
    /// Set on every packed note; clear means five plain bytes follow
    pub const PACKED: u8 = 0x80;
    pub const NOTE: u8 = 0x01;
    pub const INSTRUMENT: u8 = 0x02;
    pub const VOLUME: u8 = 0x04;
    pub const EFFECT: u8 = 0x08;
    pub const EFFECT_PARAM: u8 = 0x10;
}
