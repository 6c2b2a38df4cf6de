//! Driver byte-code constants
//!
//! Bytes below 0xE0 in a pattern stream are notes (or sample numbers); the
//! 0xE0-0xEF region holds control commands.

/// Set effect; the low 3 bits carry the effect type (0-5)
pub const SET_EFFECT_BASE: u8 = 0xE0;
/// Set instrument, followed by the instrument number
pub const SET_INSTRUMENT: u8 = 0xE8;
/// Release the current note (reserved, not emitted)
pub const RELEASE: u8 = 0xE9;
/// Set channel master volume, followed by the volume in the high nibble
pub const SET_MASTER_VOLUME: u8 = 0xEA;
/// Set speed, followed by ticks per row
pub const SET_SPEED: u8 = 0xEB;
/// Row carries no note
pub const END_ROW: u8 = 0xEC;

/// Order sequence terminator; the next byte is the loop target offset
pub const ORDER_LOOP: u8 = 0xFE;
/// Song header slot of a channel that plays nothing
pub const UNUSED_CHANNEL: u8 = 0xFF;

/// Tracker pitch code minus this is the driver's note number
pub const PITCH_DISPLACEMENT: u8 = 15;
/// Tracker instruments are 1-based, the driver's are 0-based
pub const INSTRUMENT_DISPLACEMENT: u8 = 1;
/// Driver instrument numbers are 5 bits wide
pub const INSTRUMENT_MASK: u8 = 0x1F;
/// Noise notes are taken from the instrument number minus this
pub const NOISE_INSTRUMENT_DISPLACEMENT: u8 = 0x31;

/// Valid volume-column range for "set volume" (0x10-0x4F)
pub const VOLUME_RANGE: std::ops::Range<u8> = 0x10..0x50;
/// Volumes are compared in buckets of 4
pub const VOLUME_BUCKET_SHIFT: u32 = 2;
/// Bucketed volume is sent in the high nibble
pub const VOLUME_NIBBLE_SHIFT: u32 = 4;

/// Highest effect type with a direct driver command
pub const MAX_DRIVER_EFFECT: u8 = nes_xm::effects::TONE_PORTA_VOL_SLIDE;
/// Fxx, passed through as a speed command
pub const SPEED_EFFECT: u8 = nes_xm::effects::SET_SPEED;

/// Rows sharing one activity flag byte
pub const ROWS_PER_CHUNK: u16 = 8;

/// Sample-channel instrument mapping
pub mod samples {
    /// Bass drum instrument
    pub const BASS_DRUM_INSTRUMENT: u8 = 0x39;
    /// Combined bass drum + snare instrument
    pub const DRUM_COMBO_INSTRUMENT: u8 = 0x3A;
    /// Pitched bass instrument
    pub const BASS_INSTRUMENT: u8 = 0x3B;

    /// Driver sample number of the bass drum
    pub const BASS_DRUM_SAMPLE: u8 = 0x1B;
    /// Driver sample number of bass drum + snare
    pub const DRUM_COMBO_SAMPLE: u8 = 0x1C;
    /// Pitched bass samples start at this pitch code
    pub const BASS_NOTE_DISPLACEMENT: u8 = 49;

    /// Resolve the sample byte for an instrument/note pair, if the
    /// instrument has a sample
    pub fn lookup(instrument: u8, note: u8) -> Option<u8> {
        match instrument {
            BASS_DRUM_INSTRUMENT => Some(BASS_DRUM_SAMPLE),
            DRUM_COMBO_INSTRUMENT => Some(DRUM_COMBO_SAMPLE),
            BASS_INSTRUMENT => Some(note.wrapping_sub(BASS_NOTE_DISPLACEMENT)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_region() {
        for op in [
            SET_EFFECT_BASE,
            SET_INSTRUMENT,
            RELEASE,
            SET_MASTER_VOLUME,
            SET_SPEED,
            END_ROW,
        ] {
            assert!((0xE0..0xF0).contains(&op));
        }
    }

    #[test]
    fn test_sample_lookup() {
        assert_eq!(samples::lookup(0x39, 0), Some(0x1B));
        assert_eq!(samples::lookup(0x3A, 60), Some(0x1C));
        assert_eq!(samples::lookup(0x3B, 61), Some(12));
        assert_eq!(samples::lookup(0x01, 61), None);
    }
}
