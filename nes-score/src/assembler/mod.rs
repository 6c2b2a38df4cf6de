//! Song-level assembly
//!
//! Compiles every channel, then lays out the flat pattern table, the
//! per-channel order sequences and the song header the driver starts from.

use rayon::prelude::*;

use crate::MAX_PATTERN_TABLE_ENTRIES;
use crate::channel::{ChannelKind, NUM_HW_CHANNELS};
use crate::dedup::UniquePatterns;
use crate::encoder::encode_pattern;
use crate::error::ScoreError;
use crate::opcodes::{ORDER_LOOP, UNUSED_CHANNEL};
use crate::options::ConvertOptions;
use crate::song::Song;

/// Byte code of one used hardware channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChannel {
    /// Hardware channel index
    pub channel: u8,
    /// Encoded unique patterns, in pattern-table order
    pub patterns: Vec<Vec<u8>>,
    /// Pattern-table index played at each song position
    pub order: Vec<u8>,
    /// Offset of this channel's order list within the order area
    pub loop_target: u8,
}

impl CompiledChannel {
    /// Order list as the driver reads it: entries, loop marker, loop target
    pub fn order_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.order.len() + 2);
        bytes.extend_from_slice(&self.order);
        bytes.push(ORDER_LOOP);
        bytes.push(self.loop_target);
        bytes
    }
}

/// One channel's entry in the song header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSlot {
    /// Channel plays nothing
    Unused,
    /// Channel starts at `order_offset` in the order area with `tempo`
    Used { order_offset: u8, tempo: u8 },
}

impl HeaderSlot {
    pub fn bytes(&self) -> Vec<u8> {
        match *self {
            HeaderSlot::Unused => vec![UNUSED_CHANNEL],
            HeaderSlot::Used {
                order_offset,
                tempo,
            } => vec![order_offset, tempo],
        }
    }
}

/// A compiled song, ready for the byte sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NesScore {
    /// Prepended to every label
    pub label_prefix: String,
    /// Number of song positions
    pub song_length: usize,
    /// Used channels in channel-index order
    pub channels: Vec<CompiledChannel>,
    /// One slot per hardware channel
    pub header: [HeaderSlot; NUM_HW_CHANNELS as usize],
}

impl NesScore {
    fn empty(label_prefix: &str) -> Self {
        Self {
            label_prefix: label_prefix.to_string(),
            song_length: 0,
            channels: Vec::new(),
            header: [HeaderSlot::Unused; NUM_HW_CHANNELS as usize],
        }
    }

    /// A song without positions produces no output at all
    pub fn is_empty(&self) -> bool {
        self.song_length == 0
    }

    /// Compiled channel for a hardware channel index, if it is used
    pub fn channel(&self, channel: u8) -> Option<&CompiledChannel> {
        self.channels.iter().find(|c| c.channel == channel)
    }

    /// Label of a channel's unique pattern
    pub fn pattern_label(&self, channel: u8, index: usize) -> String {
        format!("{}chn{}_ptn{}", self.label_prefix, channel, index)
    }

    /// Flat pattern table as (channel, index) pairs, channel-then-index order
    pub fn pattern_table(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.channels
            .iter()
            .flat_map(|c| (0..c.patterns.len()).map(move |i| (c.channel, i)))
    }

    /// Header bytes for all hardware channels
    pub fn header_bytes(&self) -> Vec<u8> {
        self.header.iter().flat_map(HeaderSlot::bytes).collect()
    }
}

/// What happened to one module channel
enum ChannelOutcome {
    /// Left out by the channel selection
    Skipped,
    /// No data on this channel
    Unused,
    /// Data on a channel the hardware doesn't have
    Dropped,
    Compiled {
        patterns: Vec<Vec<u8>>,
        order: Vec<usize>,
    },
}

/// Compile a song into driver byte code
///
/// Channels are compiled in parallel; the layout is assembled afterwards in
/// channel order, so the result doesn't depend on scheduling.
pub fn compile(song: &Song, options: &ConvertOptions) -> Result<NesScore, ScoreError> {
    if song.song_length() == 0 {
        return Ok(NesScore::empty(&options.label_prefix));
    }

    let outcomes = (0..song.channel_count)
        .into_par_iter()
        .map(|channel| compile_channel(song, channel, options))
        .collect::<Result<Vec<_>, _>>()?;

    let song_length = song.song_length();
    let mut score = NesScore::empty(&options.label_prefix);
    score.song_length = song_length;

    let mut pattern_offset = 0usize;
    let mut order_offset = 0usize;
    for (channel, outcome) in (0u8..).zip(outcomes) {
        let ChannelOutcome::Compiled { patterns, order } = outcome else {
            continue;
        };

        let table_len = pattern_offset + patterns.len();
        if table_len > MAX_PATTERN_TABLE_ENTRIES {
            return Err(ScoreError::PatternTableOverflow(table_len));
        }
        let loop_target =
            u8::try_from(order_offset).map_err(|_| ScoreError::OrderDataOverflow(order_offset))?;

        score.header[channel as usize] = HeaderSlot::Used {
            order_offset: loop_target,
            tempo: song.default_tempo,
        };
        score.channels.push(CompiledChannel {
            channel,
            order: order
                .iter()
                .map(|&unique| (pattern_offset + unique) as u8)
                .collect(),
            patterns,
            loop_target,
        });

        pattern_offset = table_len;
        order_offset += song_length + 2;
    }

    Ok(score)
}

fn compile_channel(
    song: &Song,
    channel: u8,
    options: &ConvertOptions,
) -> Result<ChannelOutcome, ScoreError> {
    let kind = ChannelKind::from_index(channel);
    if kind.is_some() && !options.channels.contains(channel) {
        tracing::debug!("channel {} not selected, skipping", channel);
        return Ok(ChannelOutcome::Skipped);
    }

    let unique = UniquePatterns::for_channel(song, channel)?;
    if unique.is_unused(song) {
        tracing::debug!("channel {} is empty", channel);
        return Ok(ChannelOutcome::Unused);
    }

    let Some(kind) = kind else {
        let ignored: Vec<String> = unique.non_empty(song).map(|p| p.to_string()).collect();
        tracing::warn!(
            "ignoring contents of channel {}; patterns {}",
            channel,
            ignored.join(" ")
        );
        return Ok(ChannelOutcome::Dropped);
    };

    let patterns = unique
        .indexes
        .iter()
        .map(|&pi| encode_pattern(&song.patterns[pi], pi, channel, kind))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "channel {} ({:?}): {} unique patterns",
        channel,
        kind,
        patterns.len()
    );

    Ok(ChannelOutcome::Compiled {
        patterns,
        order: unique.order,
    })
}

#[cfg(test)]
mod tests;
