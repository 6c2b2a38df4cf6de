//! Conversion options

use crate::channel::ChannelMask;

/// Settings for one conversion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Prepended to every emitted label
    pub label_prefix: String,
    /// Hardware channels to compile; the rest are left silent
    pub channels: ChannelMask,
}

impl ConvertOptions {
    /// Options with the given label prefix and all channels selected
    pub fn with_prefix(label_prefix: impl Into<String>) -> Self {
        Self {
            label_prefix: label_prefix.into(),
            ..Default::default()
        }
    }

    pub fn channels(mut self, channels: ChannelMask) -> Self {
        self.channels = channels;
        self
    }
}
