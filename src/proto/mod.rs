//! LUMP wire protocol
//!
//! Message model and byte-level framing for the LEGO UART Messaging
//! Protocol. This layer is pure: it owns no I/O and no timing, only the
//! mapping between byte sequences and [`Frame`] values.
//!
//! # Modules
//!
//! - [`msg`]: Frame model, header fields, command/info/sys constants
//! - [`codec`]: Incremental decoder, encoder, checksum

pub mod codec;
pub mod msg;

// Re-export commonly used types
pub use codec::{Decoded, checksum, decode, encode, frame_len};
pub use msg::{DataType, Frame, FrameKind, MAX_FRAME, MAX_MODES, MAX_PAYLOAD, Payload};
