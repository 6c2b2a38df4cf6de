//! In-memory module

/// Header, order table and patterns of an XM file
#[derive(Debug, Clone, PartialEq)]
pub struct XmModule {
    pub name: String,
    pub tracker_name: String,
    /// Width of every pattern row
    pub num_channels: u8,
    /// Pattern count as stored in the header
    pub num_patterns: u16,
    /// Stored but not decoded
    pub num_instruments: u16,
    /// Number of used entries in `order_table`
    pub song_length: u16,
    pub restart_position: u16,
    /// Ticks per row at song start
    pub default_speed: u16,
    pub default_bpm: u16,
    pub linear_frequency_table: bool,
    /// Pattern index for each song position, `song_length` entries
    pub order_table: Vec<u8>,
    pub patterns: Vec<XmPattern>,
}

impl XmModule {
    /// Pattern played at song position `order`
    pub fn pattern_at_order(&self, order: u16) -> Option<&XmPattern> {
        self.order_table
            .get(order as usize)
            .and_then(|&index| self.patterns.get(index as usize))
    }
}

/// Unpacked pattern, indexed `notes[row][channel]`
#[derive(Debug, Clone, PartialEq)]
pub struct XmPattern {
    pub num_rows: u16,
    pub notes: Vec<Vec<XmNote>>,
}

impl XmPattern {
    pub fn get_note(&self, row: u16, channel: u8) -> Option<&XmNote> {
        self.notes
            .get(row as usize)
            .and_then(|cells| cells.get(channel as usize))
    }

    /// Pattern of `num_rows` rows with no data on any channel
    pub fn empty(num_rows: u16, num_channels: u8) -> Self {
        Self {
            num_rows,
            notes: vec![vec![XmNote::default(); num_channels as usize]; num_rows as usize],
        }
    }
}

/// One cell of a pattern; zero in any column means "nothing"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmNote {
    /// 1-96 pitch, 97 key-off
    pub note: u8,
    /// 1-based
    pub instrument: u8,
    /// Raw volume column (0x10-0x50 set volume, higher values are commands)
    pub volume: u8,
    pub effect: u8,
    pub effect_param: u8,
}

impl XmNote {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.note == crate::NOTE_OFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(order_table: Vec<u8>, patterns: Vec<XmPattern>) -> XmModule {
        XmModule {
            name: String::new(),
            tracker_name: String::new(),
            num_channels: 1,
            num_patterns: patterns.len() as u16,
            num_instruments: 0,
            song_length: order_table.len() as u16,
            restart_position: 0,
            default_speed: 6,
            default_bpm: 125,
            linear_frequency_table: true,
            order_table,
            patterns,
        }
    }

    #[test]
    fn test_note_predicates() {
        let key_off = XmNote {
            note: crate::NOTE_OFF,
            ..Default::default()
        };
        assert!(key_off.is_note_off());
        assert!(!key_off.is_empty());
        assert!(XmNote::default().is_empty());
    }

    #[test]
    fn test_empty_pattern_shape() {
        let pattern = XmPattern::empty(64, 8);
        assert_eq!(pattern.notes.len(), 64);
        assert!(pattern.notes.iter().all(|row| row.len() == 8));
        assert_eq!(pattern.get_note(63, 7), Some(&XmNote::default()));
        assert_eq!(pattern.get_note(64, 0), None);
        assert_eq!(pattern.get_note(0, 8), None);
    }

    #[test]
    fn test_pattern_at_order() {
        let m = module(vec![1, 0, 7], vec![XmPattern::empty(8, 1), XmPattern::empty(16, 1)]);
        assert_eq!(m.pattern_at_order(0).map(|p| p.num_rows), Some(16));
        assert_eq!(m.pattern_at_order(1).map(|p| p.num_rows), Some(8));
        // Dangling order entry
        assert!(m.pattern_at_order(2).is_none());
        assert!(m.pattern_at_order(3).is_none());
    }
}
