//! Latched channel state shared by both encoding passes

use crate::opcodes::{VOLUME_BUCKET_SHIFT, VOLUME_RANGE};
use crate::song::Slot;

/// Last instrument, volume and effect the driver was told about
///
/// The activity pass works on a copy; the emission pass mutates the live
/// value that carries into the next chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderState {
    pub last_instrument: u8,
    pub last_volume: u8,
    pub last_effect_type: u8,
    pub last_effect_param: u8,
}

impl EncoderState {
    /// No instrument selected yet
    pub const NO_INSTRUMENT: u8 = 0xFF;
    /// Below the valid range, so its bucket never matches a real volume
    pub const NO_VOLUME: u8 = 0xF0;

    /// Instrument present and not the latched one
    #[inline]
    pub fn instrument_changed(&self, slot: &Slot) -> bool {
        slot.instrument != 0 && slot.instrument != self.last_instrument
    }

    /// Volume in the valid range and in a different bucket than the latched one
    #[inline]
    pub fn volume_changed(&self, slot: &Slot) -> bool {
        VOLUME_RANGE.contains(&slot.volume)
            && (slot.volume >> VOLUME_BUCKET_SHIFT) != (self.last_volume >> VOLUME_BUCKET_SHIFT)
    }

    /// Effect type differs, or a nonzero parameter differs
    #[inline]
    pub fn effect_changed(&self, slot: &Slot) -> bool {
        slot.effect_type != self.last_effect_type
            || (slot.effect_param != self.last_effect_param && slot.effect_param != 0)
    }

    /// Latch an effect the driver cannot play so it isn't reported again
    #[inline]
    pub fn latch_effect(&mut self, slot: &Slot) {
        self.last_effect_type = slot.effect_type;
        self.last_effect_param = slot.effect_param;
    }
}

impl Default for EncoderState {
    fn default() -> Self {
        Self {
            last_instrument: Self::NO_INSTRUMENT,
            last_volume: Self::NO_VOLUME,
            last_effect_type: 0,
            last_effect_param: 0,
        }
    }
}
