//! Hardware channels and channel selection

use std::fmt;
use std::str::FromStr;

/// Number of channels the sound chip has
pub const NUM_HW_CHANNELS: u8 = 5;

/// What a hardware channel is able to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Square wave (channels 0 and 1): volume, instruments, effects, notes
    Pulse,
    /// Triangle wave (channel 2): no volume control
    Triangle,
    /// Noise (channel 3): speed changes and noise periods only
    Noise,
    /// Delta-modulation samples (channel 4): fixed sample table
    Sample,
}

impl ChannelKind {
    /// Kind of the hardware channel at `channel`, if the chip has it
    pub const fn from_index(channel: u8) -> Option<Self> {
        match channel {
            0 | 1 => Some(Self::Pulse),
            2 => Some(Self::Triangle),
            3 => Some(Self::Noise),
            4 => Some(Self::Sample),
            _ => None,
        }
    }

    /// Whether the volume column can be encoded at all
    pub const fn accepts_volume(self) -> bool {
        !matches!(self, Self::Triangle | Self::Sample)
    }
}

/// Set of hardware channels to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMask(u8);

impl ChannelMask {
    /// Every hardware channel
    pub const ALL: Self = Self(0x1F);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from a bitmask; bits beyond the hardware channels are dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, channel: u8) -> bool {
        channel < NUM_HW_CHANNELS && (self.0 & (1 << channel)) != 0
    }

    pub const fn with(self, channel: u8) -> Self {
        if channel < NUM_HW_CHANNELS {
            Self(self.0 | (1 << channel))
        } else {
            self
        }
    }

    /// Selected channel indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..NUM_HW_CHANNELS).filter(|&ch| self.contains(ch))
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<String> = self.iter().map(|ch| ch.to_string()).collect();
        f.write_str(&list.join(","))
    }
}

/// Error parsing a channel list such as `0,1,4`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelMaskError {
    #[error("invalid channel `{0}` (expected 0-4)")]
    InvalidChannel(String),

    #[error("at least one channel must be selected")]
    Empty,
}

impl FromStr for ChannelMask {
    type Err = ChannelMaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = Self::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let channel = part
                .parse::<u8>()
                .ok()
                .filter(|&ch| ch < NUM_HW_CHANNELS)
                .ok_or_else(|| ChannelMaskError::InvalidChannel(part.to_string()))?;
            mask = mask.with(channel);
        }
        if mask.is_empty() {
            return Err(ChannelMaskError::Empty);
        }
        Ok(mask)
    }
}
