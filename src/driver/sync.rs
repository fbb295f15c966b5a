//! Handshake ingest engine
//!
//! Consumes the frames a device transmits between attach and its final
//! ACK, and accumulates them into a [`DeviceBuilder`]. The engine is a
//! pure frame-to-state mapping: baud scheduling, timers, and the UART
//! all stay in the port, which makes the whole handshake replayable from
//! captured byte streams.

use crate::descriptor::{DeviceBuilder, DeviceDescriptor};
use crate::error::{ProtocolError, ProtocolResult};
use crate::hal::uart::BAUD_RATE_HIGH;
use crate::proto::msg::{Frame, FrameKind, cmd};

/// Result of feeding one frame to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestEvent {
    /// Keep feeding frames.
    Continue,
    /// The peer sent its ACK: the sweep is over, finalize now.
    SweepComplete,
}

/// Accumulates the device self-description during sync.
#[derive(Debug)]
pub struct SyncEngine {
    builder: DeviceBuilder,
    target_baud: u32,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncEngine {
    /// Fresh engine for a new handshake.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: DeviceBuilder::new(),
            target_baud: BAUD_RATE_HIGH,
        }
    }

    /// Device type id, once the TYPE announcement has been seen.
    #[must_use]
    pub fn type_id(&self) -> Option<u16> {
        self.builder.type_id()
    }

    /// Baud rate the device wants for data streaming.
    #[must_use]
    pub fn target_baud(&self) -> u32 {
        self.target_baud
    }

    /// Feed one decoded frame from the ingest phase.
    ///
    /// # Errors
    ///
    /// Protocol errors mark the frame malformed; the caller discards it
    /// and stays in the ingest phase.
    pub fn ingest(&mut self, frame: &Frame) -> ProtocolResult<IngestEvent> {
        match frame.kind {
            FrameKind::Sys => {
                if frame.is_ack() {
                    return Ok(IngestEvent::SweepComplete);
                }
                // NACK/SYNC during the sweep carry no information
                Ok(IngestEvent::Continue)
            }
            FrameKind::Cmd => {
                match frame.op {
                    cmd::TYPE => {
                        let &[id, ..] = frame.payload.as_slice() else {
                            return Err(ProtocolError::BadPayload);
                        };
                        if id == 0 {
                            return Err(ProtocolError::BadPayload);
                        }
                        self.builder.set_type(id);
                    }
                    cmd::MODES => self.builder.declare_modes(&frame.payload)?,
                    cmd::SPEED => {
                        let Ok(bytes) = <[u8; 4]>::try_from(frame.payload.as_slice()) else {
                            return Err(ProtocolError::BadPayload);
                        };
                        self.target_baud = u32::from_le_bytes(bytes);
                    }
                    cmd::VERSION => self.builder.set_versions(&frame.payload)?,
                    // EXT_MODE/SELECT/WRITE have no business here
                    _ => return Err(ProtocolError::UnexpectedFrame),
                }
                Ok(IngestEvent::Continue)
            }
            FrameKind::Info => {
                self.builder.apply_info(frame.mode, frame.op, &frame.payload)?;
                Ok(IngestEvent::Continue)
            }
            // data before sync completes means the peer lost the plot
            FrameKind::Data => Err(ProtocolError::UnexpectedFrame),
        }
    }

    /// Freeze the accumulated description into a descriptor.
    ///
    /// # Errors
    ///
    /// See [`DeviceBuilder::finalize`].
    pub fn finalize(self) -> ProtocolResult<DeviceDescriptor> {
        self.builder.finalize()
    }
}
