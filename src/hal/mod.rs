//! Hardware Abstraction Layer
//!
//! This module defines the collaborator contracts the port driver is
//! written against, so the same state machine runs on real hub hardware
//! and in host-side tests.
//!
//! # Modules
//!
//! - [`clock`]: Monotonic millisecond clock and software timers
//! - [`uart`]: Half-duplex UART device contract
//!
//! # Delay Integration
//!
//! Blocking convenience helpers use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod clock;
pub mod uart;

// Re-export commonly used types
pub use clock::{Clock, Instant, Timer};
pub use uart::UartDevice;
