//! Per-mode metadata
//!
//! One [`ModeDescriptor`] per mode index, assembled from the INFO frames
//! of the sync sweep. Every field originates from the peer; after sync
//! completes the descriptor is only ever read.

use heapless::String;

use crate::proto::msg::{DataType, MAX_NAME_LEN, MAX_SYMBOL_LEN};

/// Number of Powered Up capability flag bytes in the long NAME layout.
pub const MODE_FLAGS_LEN: usize = 6;

/// A `(min, max)` scaling range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Range {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl Range {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Metadata for a single device mode.
///
/// Missing INFO sub-kinds leave their fields at the defaults: zeroed
/// ranges, empty strings, zero mappings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeDescriptor {
    /// Mode name (ASCII, up to 11 bytes)
    pub name: String<MAX_NAME_LEN>,
    /// Unit symbol (ASCII, up to 4 bytes)
    pub symbol: String<MAX_SYMBOL_LEN>,
    /// Raw value range
    pub raw: Range,
    /// Percent range
    pub pct: Range,
    /// SI unit range
    pub si: Range,
    /// Factory-calibrated range
    pub calib: Range,
    /// Input mapping capability bits
    pub mapping_in: u8,
    /// Output mapping capability bits
    pub mapping_out: u8,
    /// Powered Up mode capability flags (long NAME payloads only)
    pub flags: [u8; MODE_FLAGS_LEN],
    /// Number of values in one sample
    pub num_values: u8,
    /// Element type of each value
    pub data_type: DataType,
    /// Display width in figures
    pub digits: u8,
    /// Display decimals
    pub decimals: u8,
    pub(crate) has_format: bool,
}

impl ModeDescriptor {
    /// Whether the mode accepts written data (non-zero output mapping).
    #[must_use]
    pub const fn writable(&self) -> bool {
        self.mapping_out != 0
    }

    /// Whether the FORMAT message for this mode has arrived, making the
    /// descriptor structurally complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.has_format
    }

    /// Size in bytes of one full sample in this mode.
    #[must_use]
    pub const fn sample_len(&self) -> usize {
        self.num_values as usize * self.data_type.size()
    }
}
