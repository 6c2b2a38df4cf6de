//! Per-channel pattern deduplication
//!
//! The same musical phrase often appears on one channel in several patterns
//! that differ elsewhere. Each channel therefore gets its own set of unique
//! patterns, and its own order sequence pointing into that set.

use crate::error::ScoreError;
use crate::song::Song;

/// Unique patterns of one channel and the order sequence that uses them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquePatterns {
    /// Channel index
    pub channel: u8,
    /// Representative pattern indices, in first-seen order
    pub indexes: Vec<usize>,
    /// For every song position, the position of its representative in `indexes`
    pub order: Vec<usize>,
}

impl UniquePatterns {
    /// Find the unique patterns of `channel` and map the order table onto them
    pub fn for_channel(song: &Song, channel: u8) -> Result<Self, ScoreError> {
        let indexes = find_unique_patterns(song, channel);
        let order = map_order_table(song, channel, &indexes)?;
        Ok(Self {
            channel,
            indexes,
            order,
        })
    }

    /// Number of unique patterns
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// A channel is unused when none of its representatives has any data on it
    pub fn is_unused(&self, song: &Song) -> bool {
        self.non_empty(song).next().is_none()
    }

    /// Representative pattern indices with data on this channel
    pub fn non_empty<'a>(&'a self, song: &'a Song) -> impl Iterator<Item = usize> + 'a {
        self.indexes
            .iter()
            .copied()
            .filter(move |&pi| !song.patterns[pi].is_channel_empty(self.channel))
    }
}

/// Collect one representative per distinct channel content, scanning patterns
/// in index order
pub fn find_unique_patterns(song: &Song, channel: u8) -> Vec<usize> {
    let mut unique: Vec<usize> = Vec::with_capacity(song.pattern_count());
    for (index, pattern) in song.patterns.iter().enumerate() {
        let seen = unique
            .iter()
            .any(|&other| pattern.channel_eq(&song.patterns[other], channel));
        if !seen {
            unique.push(index);
        }
    }
    unique
}

/// Resolve every song position to the position of its representative in
/// `unique`
pub fn map_order_table(
    song: &Song,
    channel: u8,
    unique: &[usize],
) -> Result<Vec<usize>, ScoreError> {
    song.order_table
        .iter()
        .enumerate()
        .map(|(order, &pattern_idx)| {
            let pattern_idx = pattern_idx as usize;
            let pattern = song
                .patterns
                .get(pattern_idx)
                .ok_or(ScoreError::OrderOutOfRange {
                    order,
                    pattern: pattern_idx,
                    count: song.pattern_count(),
                })?;
            unique
                .iter()
                .position(|&other| pattern.channel_eq(&song.patterns[other], channel))
                .ok_or(ScoreError::UnmatchedOrderEntry {
                    channel,
                    order,
                    pattern: pattern_idx,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{Pattern, Slot};

    fn slot(note: u8) -> Slot {
        Slot {
            note,
            instrument: 1,
            ..Default::default()
        }
    }

    /// Three patterns, two channels: channel 0 repeats pattern 0 in pattern 2,
    /// channel 1 differs everywhere
    fn song() -> Song {
        let mut p0 = Pattern::empty(8, 2);
        p0.set_slot(0, 0, slot(40));
        p0.set_slot(0, 1, slot(50));
        let mut p1 = Pattern::empty(8, 2);
        p1.set_slot(0, 0, slot(41));
        p1.set_slot(0, 1, slot(51));
        let mut p2 = Pattern::empty(8, 2);
        p2.set_slot(0, 0, slot(40));
        p2.set_slot(0, 1, slot(52));

        Song {
            channel_count: 2,
            default_tempo: 6,
            order_table: vec![0, 1, 2, 2, 0],
            patterns: vec![p0, p1, p2],
        }
    }

    #[test]
    fn test_unique_patterns_per_channel() {
        let song = song();
        assert_eq!(find_unique_patterns(&song, 0), vec![0, 1]);
        assert_eq!(find_unique_patterns(&song, 1), vec![0, 1, 2]);
    }

    #[test]
    fn test_order_mapping() {
        let song = song();
        let ch0 = UniquePatterns::for_channel(&song, 0).unwrap();
        assert_eq!(ch0.order, vec![0, 1, 0, 0, 0]);
        let ch1 = UniquePatterns::for_channel(&song, 1).unwrap();
        assert_eq!(ch1.order, vec![0, 1, 2, 2, 0]);
    }

    #[test]
    fn test_order_fidelity() {
        let song = song();
        for channel in 0..song.channel_count {
            let unique = UniquePatterns::for_channel(&song, channel).unwrap();
            assert!(unique.len() <= song.pattern_count());
            for (position, &u) in unique.order.iter().enumerate() {
                let original = song.pattern_at_order(position).unwrap();
                let representative = &song.patterns[unique.indexes[u]];
                assert!(original.channel_eq(representative, channel));
            }
        }
    }

    #[test]
    fn test_equal_content_shares_representative() {
        let song = song();
        for channel in 0..song.channel_count {
            let unique = UniquePatterns::for_channel(&song, channel).unwrap();
            for (i, p) in song.patterns.iter().enumerate() {
                for (j, q) in song.patterns.iter().enumerate() {
                    if p.channel_eq(q, channel) {
                        let ri = map_order_table(
                            &Song {
                                order_table: vec![i as u8, j as u8],
                                ..song.clone()
                            },
                            channel,
                            &unique.indexes,
                        )
                        .unwrap();
                        assert_eq!(ri[0], ri[1]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_unused_channel() {
        let mut song = song();
        song.channel_count = 3;
        let ch2 = UniquePatterns::for_channel(&song, 2).unwrap();
        assert_eq!(ch2.indexes, vec![0]);
        assert!(ch2.is_unused(&song));

        let ch0 = UniquePatterns::for_channel(&song, 0).unwrap();
        assert!(!ch0.is_unused(&song));
        assert_eq!(ch0.non_empty(&song).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_unmatched_order_entry() {
        let song = song();
        // Representative set that cannot cover pattern 1
        let result = map_order_table(&song, 0, &[0]);
        assert!(matches!(
            result,
            Err(ScoreError::UnmatchedOrderEntry {
                channel: 0,
                order: 1,
                pattern: 1
            })
        ));
    }
}
