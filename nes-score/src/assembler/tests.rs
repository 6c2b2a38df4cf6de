//! Tests for song assembly

use super::*;
use crate::channel::ChannelMask;
use crate::song::{Pattern, Slot};

const TEMPO: u8 = 6;

fn note(note: u8, instrument: u8) -> Slot {
    Slot {
        note,
        instrument,
        ..Default::default()
    }
}

fn pattern(channel_count: u8, slots: &[(u16, u8, Slot)]) -> Pattern {
    let mut pattern = Pattern::empty(8, channel_count);
    for &(row, channel, slot) in slots {
        pattern.set_slot(row, channel, slot);
    }
    pattern
}

fn song(channel_count: u8, order_table: Vec<u8>, patterns: Vec<Pattern>) -> Song {
    Song {
        channel_count,
        default_tempo: TEMPO,
        order_table,
        patterns,
    }
}

/// Channel 0 repeats one phrase, channel 2 alternates two
fn two_channel_song() -> Song {
    song(
        5,
        vec![0, 1, 0],
        vec![
            pattern(5, &[(0, 0, note(40, 1)), (0, 2, note(40, 1))]),
            pattern(5, &[(0, 0, note(40, 1)), (0, 2, note(41, 1))]),
        ],
    )
}

#[test]
fn test_layout() {
    let score = compile(&two_channel_song(), &ConvertOptions::with_prefix("t_")).unwrap();

    assert_eq!(score.song_length, 3);
    assert_eq!(score.channels.len(), 2);

    let ch0 = score.channel(0).unwrap();
    assert_eq!(ch0.patterns, vec![vec![8, 0x01, 0xE8, 0x00, 0x19]]);
    assert_eq!(ch0.order_bytes(), vec![0, 0, 0, ORDER_LOOP, 0]);

    let ch2 = score.channel(2).unwrap();
    assert_eq!(
        ch2.patterns,
        vec![
            vec![8, 0x01, 0xE8, 0x00, 0x19],
            vec![8, 0x01, 0xE8, 0x00, 0x1A]
        ]
    );
    // Offset by the one pattern channel 0 contributes
    assert_eq!(ch2.order_bytes(), vec![1, 2, 1, ORDER_LOOP, 5]);

    let table: Vec<(u8, usize)> = score.pattern_table().collect();
    assert_eq!(table, vec![(0, 0), (2, 0), (2, 1)]);
    assert_eq!(score.pattern_label(2, 1), "t_chn2_ptn1");
}

#[test]
fn test_header() {
    let score = compile(&two_channel_song(), &ConvertOptions::default()).unwrap();
    assert_eq!(
        score.header,
        [
            HeaderSlot::Used {
                order_offset: 0,
                tempo: TEMPO
            },
            HeaderSlot::Unused,
            HeaderSlot::Used {
                order_offset: 5,
                tempo: TEMPO
            },
            HeaderSlot::Unused,
            HeaderSlot::Unused,
        ]
    );
    assert_eq!(
        score.header_bytes(),
        vec![0, TEMPO, 0xFF, 5, TEMPO, 0xFF, 0xFF]
    );
}

#[test]
fn test_loop_target_is_own_start() {
    let score = compile(&two_channel_song(), &ConvertOptions::default()).unwrap();
    for (channel, slot) in score.header.iter().enumerate() {
        if let HeaderSlot::Used { order_offset, .. } = slot {
            let compiled = score.channel(channel as u8).unwrap();
            assert_eq!(compiled.loop_target, *order_offset);
            let bytes = compiled.order_bytes();
            assert_eq!(bytes[bytes.len() - 2], ORDER_LOOP);
            assert_eq!(bytes[bytes.len() - 1], *order_offset);
        }
    }
}

#[test]
fn test_unused_channels_emit_nothing() {
    let score = compile(&two_channel_song(), &ConvertOptions::default()).unwrap();
    for channel in [1, 3, 4] {
        assert!(score.channel(channel).is_none());
        assert_eq!(score.header[channel as usize], HeaderSlot::Unused);
    }
    assert!(score.pattern_table().all(|(c, _)| c == 0 || c == 2));
}

#[test]
fn test_mask_skips_channel() {
    let options = ConvertOptions::default().channels(ChannelMask::from_bits(0b11110));
    let score = compile(&two_channel_song(), &options).unwrap();

    assert!(score.channel(0).is_none());
    assert_eq!(score.header[0], HeaderSlot::Unused);

    // Channel 2 now starts the pattern table and the order area
    let ch2 = score.channel(2).unwrap();
    assert_eq!(ch2.order_bytes(), vec![0, 1, 0, ORDER_LOOP, 0]);
    assert_eq!(
        score.header[2],
        HeaderSlot::Used {
            order_offset: 0,
            tempo: TEMPO
        }
    );
}

#[test]
fn test_channels_beyond_hardware_are_dropped() {
    let s = song(6, vec![0], vec![pattern(6, &[(0, 5, note(40, 1))])]);
    let score = compile(&s, &ConvertOptions::default()).unwrap();

    assert!(score.channels.is_empty());
    assert!(score.header.iter().all(|slot| *slot == HeaderSlot::Unused));
    assert_eq!(score.song_length, 1);
}

#[test]
fn test_empty_song() {
    let s = song(5, Vec::new(), vec![pattern(5, &[(0, 0, note(40, 1))])]);
    let score = compile(&s, &ConvertOptions::default()).unwrap();
    assert!(score.is_empty());
    assert!(score.channels.is_empty());
}

#[test]
fn test_fewer_module_channels_keep_five_slots() {
    let s = song(2, vec![0], vec![pattern(2, &[(0, 1, note(40, 1))])]);
    let score = compile(&s, &ConvertOptions::default()).unwrap();
    assert_eq!(score.header.len(), 5);
    assert_eq!(
        score.header_bytes(),
        vec![0xFF, 0, TEMPO, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn test_deterministic() {
    let s = two_channel_song();
    let options = ConvertOptions::with_prefix("x_");
    assert_eq!(
        compile(&s, &options).unwrap(),
        compile(&s, &options).unwrap()
    );
}

#[test]
fn test_row_count_error_aborts() {
    let mut bad = Pattern::empty(12, 5);
    bad.set_slot(0, 0, note(40, 1));
    let s = song(5, vec![0], vec![bad]);
    assert!(matches!(
        compile(&s, &ConvertOptions::default()),
        Err(ScoreError::RowCountNotMultipleOfEight {
            pattern: 0,
            rows: 12
        })
    ));
}

#[test]
fn test_pattern_table_overflow() {
    let patterns: Vec<Pattern> = (0..255u16)
        .map(|i| {
            let slot = note((i % 96) as u8 + 1, (i / 96) as u8 + 1);
            pattern(5, &[(0, 0, slot)])
        })
        .collect();
    let s = song(5, vec![0], patterns);
    assert!(matches!(
        compile(&s, &ConvertOptions::default()),
        Err(ScoreError::PatternTableOverflow(255))
    ));
}

#[test]
fn test_order_data_overflow() {
    let p = pattern(
        5,
        &[(0, 0, note(40, 1)), (0, 1, note(40, 1)), (0, 2, note(40, 1))],
    );
    let s = song(5, vec![0; 200], vec![p]);
    // Third channel would start at 2 * (200 + 2)
    assert!(matches!(
        compile(&s, &ConvertOptions::default()),
        Err(ScoreError::OrderDataOverflow(404))
    ));
}
