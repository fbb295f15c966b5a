//! Configuration types for the LUMP port driver

/// Lifecycle state of a port.
///
/// The port walks `Detached → ProbingBaud → Ingesting → AwaitingAck →
/// SettingDefaultMode → Ready`, bounces between `Ready` and
/// `ModeSwitching` on mode changes, and falls back through `Errored` to
/// `Detached` on any failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortState {
    /// No device detected
    #[default]
    Detached,
    /// Sending SPEED probes, waiting for a device to answer
    ProbingBaud,
    /// Parsing the device self-description (TYPE/MODES/SPEED/INFO)
    Ingesting,
    /// Descriptors complete, acknowledging and renegotiating baud
    AwaitingAck,
    /// Initial mode command sent, waiting for matching data
    SettingDefaultMode,
    /// Streaming data
    Ready,
    /// Mode change requested, waiting for data in the new mode
    ModeSwitching,
    /// Failure detected, teardown pending
    Errored,
}

impl PortState {
    /// Whether a frozen device descriptor exists in this state.
    #[must_use]
    pub const fn has_device(self) -> bool {
        matches!(
            self,
            PortState::SettingDefaultMode | PortState::Ready | PortState::ModeSwitching
        )
    }

    /// Whether the keep-alive supervisor runs in this state.
    #[must_use]
    pub const fn is_supervised(self) -> bool {
        matches!(
            self,
            PortState::SettingDefaultMode | PortState::Ready | PortState::ModeSwitching
        )
    }
}

/// Tunable timing of one port.
///
/// The keep-alive and watchdog periods are conventions rather than wire
/// protocol constants, so they are configurable; the defaults match the
/// values LEGO hubs use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortConfig {
    /// Keep-alive NACK period in milliseconds
    pub keepalive_ms: u32,
    /// Watchdog: maximum silence between DATA frames in milliseconds
    pub watchdog_ms: u32,
    /// Baud probe window per phase in milliseconds
    pub probe_window_ms: u32,
    /// Maximum time from a frame's header byte to its last byte
    pub frame_timeout_ms: u32,
    /// Maximum time for one outbound frame to drain
    pub write_timeout_ms: u32,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            keepalive_ms: 100,
            watchdog_ms: 1_000,
            probe_window_ms: 300,
            frame_timeout_ms: 500,
            write_timeout_ms: 500,
        }
    }
}

impl PortConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keep-alive NACK period.
    #[must_use]
    pub const fn with_keepalive_ms(mut self, ms: u32) -> Self {
        self.keepalive_ms = ms;
        self
    }

    /// Set the DATA watchdog period.
    #[must_use]
    pub const fn with_watchdog_ms(mut self, ms: u32) -> Self {
        self.watchdog_ms = ms;
        self
    }

    /// Set the baud probe window.
    #[must_use]
    pub const fn with_probe_window_ms(mut self, ms: u32) -> Self {
        self.probe_window_ms = ms;
        self
    }

    /// Set the partial-frame timeout.
    #[must_use]
    pub const fn with_frame_timeout_ms(mut self, ms: u32) -> Self {
        self.frame_timeout_ms = ms;
        self
    }

    /// Set the outbound drain timeout.
    #[must_use]
    pub const fn with_write_timeout_ms(mut self, ms: u32) -> Self {
        self.write_timeout_ms = ms;
        self
    }
}
