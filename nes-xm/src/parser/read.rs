//! XM reading

use crate::error::XmError;
use crate::module::{XmModule, XmNote, XmPattern};
use crate::{MAX_CHANNELS, MAX_PATTERN_ROWS, MAX_PATTERNS, XM_MAGIC, XM_VERSION};

use super::packing;

/// Offset of the header-size field; header sizes are counted from here
const HEADER_SIZE_OFFSET: usize = 60;

/// Read the song header, order table and patterns of an XM file
///
/// Instrument and sample data after the patterns are ignored.
pub fn parse_xm(data: &[u8]) -> Result<XmModule, XmError> {
    if data.len() < HEADER_SIZE_OFFSET {
        return Err(XmError::TooSmall);
    }
    if !data.starts_with(XM_MAGIC) {
        return Err(XmError::InvalidMagic);
    }

    let mut reader = ByteReader::new(data);
    reader.seek(XM_MAGIC.len());
    let name = read_string(reader.bytes(20)?);
    reader.skip(1); // 0x1A
    let tracker_name = read_string(reader.bytes(20)?);

    let version = reader.u16()?;
    if version != XM_VERSION {
        return Err(XmError::UnsupportedVersion(version));
    }

    let header_size = reader.u32()? as usize;
    let song_length = reader.u16()?;
    let restart_position = reader.u16()?;

    let num_channels = reader.u16()?;
    if num_channels > u16::from(MAX_CHANNELS) {
        return Err(XmError::TooManyChannels(num_channels));
    }
    let num_channels = num_channels as u8;

    let num_patterns = reader.u16()?;
    if num_patterns > MAX_PATTERNS {
        return Err(XmError::TooManyPatterns(num_patterns));
    }

    let num_instruments = reader.u16()?;
    let linear_frequency_table = reader.u16()? & 1 != 0;
    let default_speed = reader.u16()?;
    let default_bpm = reader.u16()?;

    let order_table = reader
        .bytes(256)?
        .iter()
        .copied()
        .take(song_length as usize)
        .collect();

    reader.seek(HEADER_SIZE_OFFSET + header_size);

    let patterns = (0..num_patterns)
        .map(|index| {
            read_pattern(&mut reader, num_channels).map_err(|_| XmError::InvalidPattern(index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(XmModule {
        name,
        tracker_name,
        num_channels,
        num_patterns,
        num_instruments,
        song_length,
        restart_position,
        default_speed,
        default_bpm,
        linear_frequency_table,
        order_table,
        patterns,
    })
}

/// Read one pattern header and its packed rows
pub(crate) fn read_pattern(
    reader: &mut ByteReader<'_>,
    num_channels: u8,
) -> Result<XmPattern, XmError> {
    // The header length counts its own 4 bytes
    let start = reader.position();
    let header_length = reader.u32()? as usize;
    reader.skip(1); // packing type, always 0
    let num_rows = reader.u16()?;
    if num_rows == 0 || num_rows > MAX_PATTERN_ROWS {
        return Err(XmError::InvalidPattern(0));
    }
    let packed_size = reader.u16()? as usize;
    reader.seek(start + header_length);

    if packed_size == 0 {
        return Ok(XmPattern::empty(num_rows, num_channels));
    }

    let data_start = reader.position();
    let notes = (0..num_rows)
        .map(|_| {
            (0..num_channels)
                .map(|_| read_note(reader))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    reader.seek(data_start + packed_size);

    Ok(XmPattern { num_rows, notes })
}

/// Read one note in packed or plain form
pub(crate) fn read_note(reader: &mut ByteReader<'_>) -> Result<XmNote, XmError> {
    let lead = reader.u8()?;

    if lead & packing::PACKED == 0 {
        return Ok(XmNote {
            note: lead,
            instrument: reader.u8()?,
            volume: reader.u8()?,
            effect: reader.u8()?,
            effect_param: reader.u8()?,
        });
    }

    let mut field = |bit: u8| -> Result<u8, XmError> {
        if lead & bit != 0 { reader.u8() } else { Ok(0) }
    };
    Ok(XmNote {
        note: field(packing::NOTE)?,
        instrument: field(packing::INSTRUMENT)?,
        volume: field(packing::VOLUME)?,
        effect: field(packing::EFFECT)?,
        effect_param: field(packing::EFFECT_PARAM)?,
    })
}

/// Fixed-width text field: up to the first NUL, trailing spaces dropped
pub(crate) fn read_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// Little-endian reader over a byte slice
///
/// Seeking past the end is allowed; the next read fails with `UnexpectedEof`.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn skip(&mut self, len: usize) {
        self.pos = self.pos.saturating_add(len);
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], XmError> {
        let end = self.pos.checked_add(len).ok_or(XmError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(XmError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, XmError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, XmError> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, XmError> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
