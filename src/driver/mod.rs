//! Core port driver components.
//!
//! This module contains the building blocks for running one LUMP port:
//! the port facade, the handshake automaton, and the keep-alive
//! supervisor.
//!
//! # Overview
//!
//! - [`config`]: Configuration types and the port state enum
//! - [`port`]: The port facade and its cooperative poll loop
//! - [`sync`]: Ingest engine for the cold→ready handshake
//! - [`supervisor`]: Keep-alive ticks and the data watchdog
//!
//! # Usage
//!
//! ```ignore
//! use ph_lump_uart::{Port, PortConfig};
//!
//! let mut port = Port::new(uart, PortConfig::default());
//! loop {
//!     port.poll(clock.now());
//!     if let Ok(info) = port.info() {
//!         // device is synced
//!     }
//! }
//! ```

// Submodules
pub mod config;
pub mod port;
pub mod supervisor;
pub mod sync;

// Re-exports for convenience
pub use config::{PortConfig, PortState};
pub use port::{Port, PortInfo, Sample};
