//! Per-channel pattern encoder
//!
//! A pattern is encoded as its row count followed by one group per eight
//! rows: a flag byte with bit *i* set when row *i* carries data, then the data
//! of each flagged row.
//!
//! Each group is built in two passes over the same rows. The activity pass
//! decides, on a throwaway copy of the latched state, which rows need data.
//! The emission pass then replays the rows against the live state and writes
//! bytes for the flagged ones. Activity is decided by the first matching
//! trigger (note, instrument change, volume change, effect change), but a
//! flagged row emits every change the channel can express.

mod state;


pub use state::EncoderState;

use crate::channel::ChannelKind;
use crate::error::ScoreError;
use crate::opcodes::{
    END_ROW, INSTRUMENT_DISPLACEMENT, INSTRUMENT_MASK, MAX_DRIVER_EFFECT,
    NOISE_INSTRUMENT_DISPLACEMENT, PITCH_DISPLACEMENT, ROWS_PER_CHUNK, SET_EFFECT_BASE,
    SET_INSTRUMENT, SET_MASTER_VOLUME, SET_SPEED, SPEED_EFFECT, VOLUME_BUCKET_SHIFT,
    VOLUME_NIBBLE_SHIFT, VOLUME_RANGE, samples,
};
use crate::song::{Pattern, Slot};

/// Encode one channel of one pattern
///
/// `pattern_index` is only used for error reporting. `kind` must be the kind
/// of `channel`.
pub fn encode_pattern(
    pattern: &Pattern,
    pattern_index: usize,
    channel: u8,
    kind: ChannelKind,
) -> Result<Vec<u8>, ScoreError> {
    if pattern.row_count % ROWS_PER_CHUNK != 0 {
        return Err(ScoreError::RowCountNotMultipleOfEight {
            pattern: pattern_index,
            rows: pattern.row_count,
        });
    }

    let encoder = ChannelEncoder { channel, kind };
    let mut state = EncoderState::default();
    let mut out = Vec::with_capacity(1 + pattern.row_count as usize * 2);

    // The driver counts rows in a byte; 256 wraps to 0
    out.push(pattern.row_count as u8);

    for chunk_start in (0..pattern.row_count).step_by(ROWS_PER_CHUNK as usize) {
        let rows: Vec<(u16, Slot)> = (chunk_start..chunk_start + ROWS_PER_CHUNK)
            .map(|row| (row, pattern.slot(row, channel)))
            .collect();

        let mut lookahead = state;
        let mut flags = 0u8;
        for (i, (row, slot)) in rows.iter().enumerate() {
            if encoder.row_is_active(&mut lookahead, slot, *row) {
                flags |= 1 << i;
            }
        }
        out.push(flags);

        for (i, (row, slot)) in rows.iter().enumerate() {
            if flags & (1 << i) != 0 {
                encoder.emit_row(&mut state, slot, *row, &mut out);
            }
        }
    }

    Ok(out)
}

/// Channel identity threaded through both passes
struct ChannelEncoder {
    channel: u8,
    kind: ChannelKind,
}

impl ChannelEncoder {
    /// Activity pass: decide whether `slot` needs data, first trigger wins
    fn row_is_active(&self, state: &mut EncoderState, slot: &Slot, row: u16) -> bool {
        if slot.has_note() {
            return true;
        }

        if state.instrument_changed(slot) {
            state.last_instrument = slot.instrument;
            return true;
        }

        // A nonzero volume column settles the row even when it changes nothing
        if slot.volume != 0 {
            if !state.volume_changed(slot) {
                return false;
            }
            state.last_volume = slot.volume;
            if !self.kind.accepts_volume() {
                tracing::warn!(
                    "volume column bytes are ignored for channel {}, row {}",
                    self.channel,
                    row
                );
                return false;
            }
            return true;
        }

        if state.effect_changed(slot) {
            if slot.effect_param != 0 {
                state.last_effect_param = slot.effect_param;
            }
            state.last_effect_type = slot.effect_type;
            return true;
        }

        false
    }

    /// Emission pass: write the bytes of a flagged row
    fn emit_row(&self, state: &mut EncoderState, slot: &Slot, row: u16, out: &mut Vec<u8>) {
        match self.kind {
            ChannelKind::Pulse => {
                if state.volume_changed(slot) {
                    out.push(SET_MASTER_VOLUME);
                    out.push(
                        ((slot.volume - VOLUME_RANGE.start) >> VOLUME_BUCKET_SHIFT)
                            << VOLUME_NIBBLE_SHIFT,
                    );
                    state.last_volume = slot.volume;
                }
                self.emit_melodic(state, slot, row, out);
            }
            ChannelKind::Triangle => self.emit_melodic(state, slot, row, out),
            ChannelKind::Noise => {
                // No volume command on this channel; the change is absorbed
                if state.volume_changed(slot) {
                    state.last_volume = slot.volume;
                }
                if state.effect_changed(slot) {
                    self.emit_speed_only(state, slot, row, out);
                }
                out.push(if slot.has_note() {
                    slot.instrument.wrapping_sub(NOISE_INSTRUMENT_DISPLACEMENT)
                } else {
                    END_ROW
                });
            }
            ChannelKind::Sample => {
                if state.effect_changed(slot) {
                    self.unsupported_effect(state, slot, row);
                }
                if let Some(sample) = samples::lookup(slot.instrument, slot.note) {
                    out.push(sample);
                }
            }
        }
    }

    /// Instrument, effect and note handling shared by pulse and triangle
    fn emit_melodic(&self, state: &mut EncoderState, slot: &Slot, row: u16, out: &mut Vec<u8>) {
        if state.instrument_changed(slot) {
            out.push(SET_INSTRUMENT);
            out.push(slot.instrument.wrapping_sub(INSTRUMENT_DISPLACEMENT) & INSTRUMENT_MASK);
            state.last_instrument = slot.instrument;
        }

        if state.effect_changed(slot) {
            match slot.effect_type {
                effect_type @ 0..=MAX_DRIVER_EFFECT => {
                    out.push(SET_EFFECT_BASE | effect_type);
                    // Arpeggio with a zero parameter switches the effect off
                    if slot.effect_param != 0 || effect_type == 0 {
                        state.last_effect_param = slot.effect_param;
                    }
                    if effect_type != 0 {
                        out.push(state.last_effect_param);
                    }
                    state.last_effect_type = effect_type;
                }
                _ => self.emit_speed_only(state, slot, row, out),
            }
        }

        out.push(if slot.has_note() {
            slot.note.wrapping_sub(PITCH_DISPLACEMENT)
        } else {
            END_ROW
        });
    }

    /// Speed changes are sent as-is and never latched
    fn emit_speed_only(&self, state: &mut EncoderState, slot: &Slot, row: u16, out: &mut Vec<u8>) {
        if slot.effect_type == SPEED_EFFECT {
            out.push(SET_SPEED);
            out.push(slot.effect_param);
        } else {
            self.unsupported_effect(state, slot, row);
        }
    }

    fn unsupported_effect(&self, state: &mut EncoderState, slot: &Slot, row: u16) {
        tracing::warn!(
            "ignoring effect {:X}{:02X} in channel {}, row {}",
            slot.effect_type,
            slot.effect_param,
            self.channel,
            row
        );
        state.latch_effect(slot);
    }
}
