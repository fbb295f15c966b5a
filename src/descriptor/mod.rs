//! Device and mode descriptors
//!
//! Everything a LUMP device says about itself during synchronization ends
//! up here: the device type and versions, and one [`ModeDescriptor`] per
//! mode with its value format, ranges, and capabilities.
//!
//! # Lifecycle
//!
//! A [`DeviceBuilder`] is created empty when the handshake starts and fed
//! every CMD/INFO frame of the sweep. Arrival order is not guaranteed and
//! duplicates overwrite. When the peer signals the end of the sweep, the
//! builder is finalized into an immutable [`DeviceDescriptor`]; the
//! descriptor lives until the port leaves the ready states (disconnect or
//! error) and is then dropped wholesale.

pub mod device;
pub mod mode;

// Re-export commonly used types
pub use device::{DeviceBuilder, DeviceDescriptor, default_mode_for};
pub use mode::{ModeDescriptor, Range};
