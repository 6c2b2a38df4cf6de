//! Song model consumed by the pattern compiler

use nes_xm::{XmModule, XmNote, XmPattern};

use crate::error::ScoreError;

/// A tracker song reduced to what the driver can play
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Number of channels in every pattern
    pub channel_count: u8,
    /// Initial speed (ticks per row)
    pub default_tempo: u8,
    /// Pattern index played at each song position
    pub order_table: Vec<u8>,
    /// Pattern data
    pub patterns: Vec<Pattern>,
}

impl Song {
    /// Number of song positions
    pub fn song_length(&self) -> usize {
        self.order_table.len()
    }

    /// Number of patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Get the pattern at the given order position
    pub fn pattern_at_order(&self, order: usize) -> Option<&Pattern> {
        let pattern_idx = *self.order_table.get(order)? as usize;
        self.patterns.get(pattern_idx)
    }

    /// Check that every order position references an existing pattern
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (order, &pattern) in self.order_table.iter().enumerate() {
            if pattern as usize >= self.patterns.len() {
                return Err(ScoreError::OrderOutOfRange {
                    order,
                    pattern: pattern as usize,
                    count: self.patterns.len(),
                });
            }
        }
        Ok(())
    }
}

impl From<&XmModule> for Song {
    fn from(xm: &XmModule) -> Self {
        Self {
            channel_count: xm.num_channels,
            default_tempo: xm.default_speed.min(u8::MAX as u16) as u8,
            order_table: xm.order_table.clone(),
            patterns: xm.patterns.iter().map(Pattern::from).collect(),
        }
    }
}

/// A grid of rows x channel slots
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Number of rows (a multiple of 8 for anything the driver plays)
    pub row_count: u16,
    /// Slot data: [row][channel]
    pub rows: Vec<Vec<Slot>>,
}

impl Pattern {
    /// Create an empty pattern
    pub fn empty(row_count: u16, channel_count: u8) -> Self {
        let rows = (0..row_count)
            .map(|_| vec![Slot::default(); channel_count as usize])
            .collect();
        Self { row_count, rows }
    }

    /// Slot at the given row and channel; missing slots read as empty
    #[inline]
    pub fn slot(&self, row: u16, channel: u8) -> Slot {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(channel as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Store a slot, widening the row if needed
    pub fn set_slot(&mut self, row: u16, channel: u8, slot: Slot) {
        let row = &mut self.rows[row as usize];
        if row.len() <= channel as usize {
            row.resize(channel as usize + 1, Slot::default());
        }
        row[channel as usize] = slot;
    }

    /// Check if two patterns carry identical data on one channel
    ///
    /// Other channels are not looked at.
    pub fn channel_eq(&self, other: &Pattern, channel: u8) -> bool {
        self.row_count == other.row_count
            && (0..self.row_count).all(|row| self.slot(row, channel) == other.slot(row, channel))
    }

    /// Check if every slot of one channel is empty
    pub fn is_channel_empty(&self, channel: u8) -> bool {
        (0..self.row_count).all(|row| self.slot(row, channel).is_empty())
    }
}

impl From<&XmPattern> for Pattern {
    fn from(xm: &XmPattern) -> Self {
        Self {
            row_count: xm.num_rows,
            rows: xm
                .notes
                .iter()
                .map(|row| row.iter().map(Slot::from).collect())
                .collect(),
        }
    }
}

/// One channel's data on one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    /// Pitch code, 0 = none
    pub note: u8,
    /// Instrument number, 0 = none
    pub instrument: u8,
    /// Volume column, 0 = no change
    pub volume: u8,
    /// Effect command
    pub effect_type: u8,
    /// Effect parameter
    pub effect_param: u8,
}

impl Slot {
    /// Check if every field is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check if this slot triggers a note
    #[inline]
    pub fn has_note(&self) -> bool {
        self.note != 0
    }
}

impl From<&XmNote> for Slot {
    fn from(note: &XmNote) -> Self {
        Self {
            note: note.note,
            instrument: note.instrument,
            volume: note.volume,
            effect_type: note.effect,
            effect_param: note.effect_param,
        }
    }
}
