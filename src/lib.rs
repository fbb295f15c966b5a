//! LUMP Port Driver
//!
//! A `no_std`, `no_alloc` Rust implementation of the hub side of the
//! LEGO UART Messaging Protocol (LUMP), the wire protocol Powered Up
//! sensors and motors speak over a half-duplex UART line.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Port Layer** ([`driver::port`]): State machine driving detect,
//!    sync, keep-alive, and mode switching for one port
//! 2. **Protocol Layer** ([`proto`]): Frame model, codec, and checksum
//! 3. **HAL Layer** ([`hal`]): UART and clock contracts the driver is
//!    written against
//!
//! ## Protocol Compliance
//!
//! - **LUMP framing**: header kinds, power-of-two payload sizes,
//!   inverted-XOR checksum
//! - **Powered Up handshake**: 115200/2400 baud probing, the
//!   TYPE/MODES/SPEED/VERSION/INFO sweep, ACK finalization
//! - **Extended modes**: EXT_MODE handling for devices with more than
//!   8 modes
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for error and state types
//! - `critical-section`: Enable the ISR-safe [`SharedPort`] wrapper
//! - `async`: Enable async/await support with wakers
//!
//! # Example
//!
//! ```ignore
//! use ph_lump_uart::{Port, PortConfig, type_id};
//!
//! // uart: your UartDevice implementation; clock: a monotonic ms source
//! let mut port = Port::new(uart, PortConfig::default());
//!
//! loop {
//!     port.poll(clock.now());
//!
//!     match port.assert_type_id(type_id::ANY_LUMP_UART) {
//!         Ok(id) => {
//!             let info = port.info().unwrap();
//!             // pick a mode, read samples
//!             let _ = port.set_mode(0);
//!         }
//!         Err(nb::Error::WouldBlock) => continue, // still syncing
//!         Err(nb::Error::Other(e)) => panic!("port failed: {}", e),
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! Everything is statically sized: one port is a few hundred bytes of
//! state plus up to 16 mode descriptors. No allocator is required.
//!
//! # Scheduling Model
//!
//! The driver is single-threaded and cooperative: [`Port::poll`]
//! advances the reader, timer, and writer tasks and returns without
//! blocking. Call it from a main loop, a 1 ms tick, or a UART
//! interrupt; see [`sync`] for sharing a port across contexts.

#![cfg_attr(docsrs, doc(cfg_hide(feature = "async")))]
#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod descriptor;
pub mod driver;
pub mod error;
pub mod hal;
pub mod proto;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use descriptor::{DeviceDescriptor, ModeDescriptor, Range};
pub use driver::config::{PortConfig, PortState};
pub use driver::port::{Port, PortInfo, Sample};
pub use error::{
    DeviceError, DeviceResult, Error, IoError, IoResult, ProtocolError, ProtocolResult, Result,
};
pub use hal::clock::{Clock, Instant, Timer};
pub use hal::uart::UartDevice;
pub use proto::msg::{DataType, Frame, FrameKind, type_id};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedPort;

// Re-export async types when the async feature is enabled
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub use sync::asynch::{AsyncPortExt, AsyncPortState, SampleSnapshot};

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level
/// facade focused on driver types.
pub mod constants {
    pub use crate::hal::uart::{BAUD_RATE_HIGH, BAUD_RATE_LOW};
    pub use crate::proto::msg::{MAX_FRAME, MAX_MODES, MAX_NAME_LEN, MAX_PAYLOAD, MAX_SYMBOL_LEN};
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe port instance for synchronous use.
///
/// This macro expands to an empty `SharedPort` static; install the port
/// with `init` once the UART exists.
///
/// # Examples
///
/// ```ignore
/// ph_lump_uart::port_static_sync!(PORT, HubUart);
///
/// PORT.init(Port::new(uart, PortConfig::default()));
/// PORT.with(|port| port.set_mode(1));
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! port_static_sync {
    ($name:ident, $uart:ty) => {
        static $name: $crate::sync::SharedPort<$uart> = $crate::sync::SharedPort::new();
    };
}

/// Declare static storage for async port usage (SharedPort + AsyncPortState).
///
/// # Examples
///
/// ```ignore
/// ph_lump_uart::port_static_async!(PORT, PORT_WAKERS, HubUart);
///
/// // in the tick interrupt:
/// PORT.poll_and_notify(clock_now(), &PORT_WAKERS);
///
/// // in an async task:
/// PORT.ready_async(&PORT_WAKERS).await?;
/// ```
#[cfg(feature = "async")]
#[macro_export]
macro_rules! port_static_async {
    ($port:ident, $state:ident, $uart:ty) => {
        static $port: $crate::sync::SharedPort<$uart> = $crate::sync::SharedPort::new();
        static $state: $crate::sync::AsyncPortState = $crate::sync::AsyncPortState::new();
    };
}
