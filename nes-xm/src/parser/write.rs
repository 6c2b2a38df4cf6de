//! XM writing
//!
//! Emits a header, order table and packed patterns with no instruments. Used
//! to build modules programmatically, mostly for tests.

use crate::module::{XmModule, XmNote, XmPattern};
use crate::{XM_MAGIC, XM_VERSION};

use super::packing;

/// Header bytes from the header-size field through the order table
const HEADER_SIZE: u32 = 276;

/// Pattern header bytes, length field included
const PATTERN_HEADER_SIZE: u32 = 9;

/// Serialize a module's header and patterns
///
/// The instrument count is written as zero and `num_patterns` is taken from
/// `patterns.len()`.
pub fn write_xm(module: &XmModule) -> Vec<u8> {
    let mut w = XmWriter(Vec::with_capacity(336 + module.patterns.len() * 64));

    w.bytes(XM_MAGIC);
    w.text::<20>(&module.name);
    w.u8(0x1A);
    w.text::<20>(&module.tracker_name);
    w.u16(XM_VERSION);
    w.u32(HEADER_SIZE);
    w.u16(module.song_length);
    w.u16(module.restart_position);
    w.u16(u16::from(module.num_channels));
    w.u16(module.patterns.len() as u16);
    w.u16(0);
    w.u16(u16::from(module.linear_frequency_table));
    w.u16(module.default_speed);
    w.u16(module.default_bpm);

    let mut orders = [0u8; 256];
    for (slot, &pattern) in orders.iter_mut().zip(&module.order_table) {
        *slot = pattern;
    }
    w.bytes(&orders);

    for pattern in &module.patterns {
        let packed = pack_pattern_data(pattern, module.num_channels);
        w.u32(PATTERN_HEADER_SIZE);
        w.u8(0);
        w.u16(pattern.num_rows);
        w.u16(packed.len() as u16);
        w.bytes(&packed);
    }

    w.0
}

/// Pack every row to `num_channels` notes; missing notes are written empty
pub(crate) fn pack_pattern_data(pattern: &XmPattern, num_channels: u8) -> Vec<u8> {
    let width = num_channels as usize;
    let mut out = Vec::with_capacity(pattern.notes.len() * width);
    for row in &pattern.notes {
        for channel in 0..width {
            pack_note(&mut out, row.get(channel).copied().unwrap_or_default());
        }
    }
    out
}

fn pack_note(out: &mut Vec<u8>, note: XmNote) {
    let fields = [
        (packing::NOTE, note.note),
        (packing::INSTRUMENT, note.instrument),
        (packing::VOLUME, note.volume),
        (packing::EFFECT, note.effect),
        (packing::EFFECT_PARAM, note.effect_param),
    ];
    let lead = fields
        .iter()
        .filter(|(_, value)| *value != 0)
        .fold(packing::PACKED, |lead, (bit, _)| lead | bit);
    out.push(lead);
    out.extend(fields.iter().map(|&(_, v)| v).filter(|&v| v != 0));
}

struct XmWriter(Vec<u8>);

impl XmWriter {
    fn bytes(&mut self, data: &[u8]) {
        self.0.extend_from_slice(data);
    }

    fn u8(&mut self, value: u8) {
        self.0.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.bytes(&value.to_le_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.bytes(&value.to_le_bytes());
    }

    /// NUL-padded, truncated to `N` bytes
    fn text<const N: usize>(&mut self, s: &str) {
        let mut buf = [0u8; N];
        let len = s.len().min(N);
        buf[..len].copy_from_slice(&s.as_bytes()[..len]);
        self.bytes(&buf);
    }
}
