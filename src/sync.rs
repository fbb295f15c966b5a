//! ISR-Safe Synchronization Wrappers
//!
//! This module provides interrupt-safe wrappers for the port driver
//! using the `critical-section` crate, so the same [`crate::Port`] can
//! be polled from a timer interrupt and queried from the main loop.
//!
//! # Types
//!
//! - [`SharedPort`] - Synchronous ISR-safe port wrapper
//! - [`AsyncPortState`] - Waker storage for async/await use (requires
//!   the `async` feature)
//!
//! # When to Use
//!
//! Use `SharedPort` when you need to:
//! - Poll the port from a timer or UART interrupt
//! - Query it from thread/main-loop context at the same time
//! - Avoid `unsafe` in your application code
//!
//! For single-context use (one task owns the port), the plain
//! [`crate::Port`] is simpler and has no overhead.
//!
//! # Example
//!
//! ```ignore
//! use ph_lump_uart::sync::SharedPort;
//!
//! static PORT: SharedPort<HubUart> = SharedPort::new();
//!
//! fn main() {
//!     PORT.init(Port::new(uart, PortConfig::default()));
//!
//!     loop {
//!         if let Some(Ok(id)) = PORT.with(|port| port.type_id().ok()) {
//!             // device attached and synced
//!         }
//!     }
//! }
//!
//! #[interrupt]
//! fn TIMER_1MS() {
//!     PORT.poll(clock_now());
//! }
//! ```
//!
//! # Implementation Note
//!
//! The critical section implementation is provided by the HAL crate
//! (e.g., `esp-hal`, `cortex-m`). You must enable the appropriate
//! feature there; on single-core parts it typically disables interrupts
//! for the duration of the closure.

pub mod primitives;
pub mod shared;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod asynch;

pub use primitives::CriticalSectionCell;
pub use shared::SharedPort;

#[cfg(feature = "async")]
pub use asynch::{AsyncPortExt, AsyncPortState, SampleSnapshot};
