//! LUMP frame model
//!
//! A frame is one message on the half-duplex line. The first byte (the
//! header) carries the message kind in bits 7:6, the payload size as a
//! power of two in bits 5:3, and a kind-specific number in bits 2:0:
//! the command for CMD frames, the mode low bits for INFO and DATA
//! frames, and the sentinel value for SYS frames.
//!
//! INFO frames insert one extra byte after the header: the info sub-kind,
//! whose bit 5 extends the mode index past 7. All frames except the
//! single-byte SYS sentinels end in a checksum byte.

use crate::error::{ProtocolError, ProtocolResult};

/// Largest payload a header can encode (size field 5 → 32 bytes).
pub const MAX_PAYLOAD: usize = 32;

/// Largest complete frame: header + info sub-kind + payload + checksum.
pub const MAX_FRAME: usize = MAX_PAYLOAD + 3;

/// Highest number of modes a device can declare (3 header bits plus the
/// mode+8 flag).
pub const MAX_MODES: usize = 16;

/// Longest mode name in an INFO NAME payload.
pub const MAX_NAME_LEN: usize = 11;

/// Name field length in the flag-carrying NAME payload layout.
pub const SHORT_NAME_LEN: usize = 6;

/// Longest unit symbol in an INFO SYMBOL payload.
pub const MAX_SYMBOL_LEN: usize = 4;

/// Frame payload storage.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;

/// SYS frame sentinel bytes. These frames are exactly one byte long and
/// carry no checksum.
pub mod sys {
    /// Stream alignment marker.
    pub const SYNC: u8 = 0x00;
    /// Keep-alive, hub to device.
    pub const NACK: u8 = 0x02;
    /// Handshake acknowledgement.
    pub const ACK: u8 = 0x04;
}

/// CMD frame command numbers (header bits 2:0).
pub mod cmd {
    /// Device type announcement (payload: type id byte).
    pub const TYPE: u8 = 0x00;
    /// Mode and view counts (payload: 2 or 4 bytes).
    pub const MODES: u8 = 0x01;
    /// Baud rate request/announcement (payload: u32 LE).
    pub const SPEED: u8 = 0x02;
    /// Select the active mode (payload: mode byte).
    pub const SELECT: u8 = 0x03;
    /// Raw write passthrough (unused by this driver, accepted on rx).
    pub const WRITE: u8 = 0x04;
    /// Mode index extension for the 3-bit DATA mode field (payload: 0 or 8).
    pub const EXT_MODE: u8 = 0x06;
    /// Firmware and hardware versions (payload: 2 × u32 LE).
    pub const VERSION: u8 = 0x07;
}

/// INFO sub-kind bytes (second frame byte, after masking the mode flag).
pub mod info {
    /// Mode name; long payloads also carry mode capability flags.
    pub const NAME: u8 = 0x00;
    /// Raw value range (2 × f32 LE).
    pub const RAW: u8 = 0x01;
    /// Percent range (2 × f32 LE).
    pub const PCT: u8 = 0x02;
    /// SI unit range (2 × f32 LE).
    pub const SI: u8 = 0x03;
    /// Unit symbol (ASCII).
    pub const SYMBOL: u8 = 0x04;
    /// Input/output mapping capability bits (2 bytes).
    pub const MAPPING: u8 = 0x05;
    /// Allowed mode combinations (u16 LE list).
    pub const MODE_COMBOS: u8 = 0x06;
    /// Factory-calibrated value range (2 × f32 LE).
    pub const CALIB: u8 = 0x07;
    /// First of the motor calibration sub-kinds (accepted, not stored).
    pub const MOTOR_FIRST: u8 = 0x08;
    /// Last of the motor calibration sub-kinds.
    pub const MOTOR_LAST: u8 = 0x0C;
    /// Flag bit: the frame addresses mode `low3 + 8`.
    pub const MODE_PLUS_8: u8 = 0x20;
    /// Value format: count, data type, figures, decimals (4 bytes).
    pub const FORMAT: u8 = 0x80;
}

/// Known LEGO device type ids.
///
/// The wire carries the id as a single byte; the id space is 16 bits.
pub mod type_id {
    /// Wildcard: matches any LUMP UART device in `assert_type_id`.
    pub const ANY_LUMP_UART: u16 = 0xFFFF;
    /// BOOST Color and Distance Sensor.
    pub const COLOR_DISTANCE_SENSOR: u16 = 37;
    /// BOOST Interactive Motor.
    pub const INTERACTIVE_MOTOR: u16 = 38;
    /// Technic Large Linear Motor.
    pub const TECHNIC_LARGE_MOTOR: u16 = 46;
    /// Technic XL Linear Motor.
    pub const TECHNIC_XL_MOTOR: u16 = 47;
}

/// Element type of a mode's sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataType {
    /// Signed 8-bit integer
    #[default]
    I8 = 0,
    /// Signed 16-bit integer, little-endian
    I16 = 1,
    /// Signed 32-bit integer, little-endian
    I32 = 2,
    /// IEEE-754 32-bit float, little-endian
    F32 = 3,
}

impl DataType {
    /// Decode the FORMAT payload encoding.
    pub const fn from_raw(raw: u8) -> ProtocolResult<Self> {
        match raw {
            0 => Ok(DataType::I8),
            1 => Ok(DataType::I16),
            2 => Ok(DataType::I32),
            3 => Ok(DataType::F32),
            _ => Err(ProtocolError::BadPayload),
        }
    }

    /// Size of one value element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            DataType::I8 => 1,
            DataType::I16 => 2,
            DataType::I32 | DataType::F32 => 4,
        }
    }
}

/// Message kind from header bits 7:6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrameKind {
    /// Single-byte system frame (SYNC/NACK/ACK)
    #[default]
    Sys = 0,
    /// Command frame
    Cmd = 1,
    /// Mode information frame
    Info = 2,
    /// Sample data frame
    Data = 3,
}

impl FrameKind {
    /// Kind from a header byte.
    #[must_use]
    pub const fn from_header(header: u8) -> Self {
        match header >> 6 {
            0 => FrameKind::Sys,
            1 => FrameKind::Cmd,
            2 => FrameKind::Info,
            _ => FrameKind::Data,
        }
    }

    const fn bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// One decoded LUMP frame.
///
/// `op` is the kind-specific number: the SYS sentinel byte, the CMD
/// command number, or the INFO sub-kind with the mode flag removed; it is
/// zero for DATA frames. `mode` is the effective mode index for INFO
/// frames (including the +8 flag) and the raw 3-bit field for DATA frames
/// (the extension is line state owned by the driver, not the codec).
///
/// Payloads are stored exactly as framed, i.e. already padded to the
/// power-of-two length the header encodes.
///
/// The default frame is the SYNC marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Message kind
    pub kind: FrameKind,
    /// Kind-specific operation byte
    pub op: u8,
    /// Mode index (INFO/DATA only)
    pub mode: u8,
    /// Payload bytes, power-of-two length (empty for SYS)
    pub payload: Payload,
}

impl Frame {
    /// ACK system frame.
    #[must_use]
    pub fn ack() -> Self {
        Self::sys(sys::ACK)
    }

    /// NACK (keep-alive) system frame.
    #[must_use]
    pub fn nack() -> Self {
        Self::sys(sys::NACK)
    }

    /// SYNC system frame.
    #[must_use]
    pub fn sync() -> Self {
        Self::sys(sys::SYNC)
    }

    fn sys(op: u8) -> Self {
        Self {
            kind: FrameKind::Sys,
            op,
            mode: 0,
            payload: Payload::new(),
        }
    }

    /// CMD frame with a raw payload, padded to a power of two.
    ///
    /// # Errors
    ///
    /// `BadLength` when the payload is empty or longer than 32 bytes.
    pub fn cmd(command: u8, payload: &[u8]) -> ProtocolResult<Self> {
        Ok(Self {
            kind: FrameKind::Cmd,
            op: command,
            mode: 0,
            payload: padded(payload)?,
        })
    }

    fn cmd_byte(command: u8, value: u8) -> Self {
        let mut payload = Payload::new();
        let _ = payload.push(value);
        Self {
            kind: FrameKind::Cmd,
            op: command,
            mode: 0,
            payload,
        }
    }

    /// SPEED request for the given baud rate.
    #[must_use]
    pub fn speed(baud: u32) -> Self {
        let mut payload = Payload::new();
        let _ = payload.extend_from_slice(&baud.to_le_bytes());
        Self {
            kind: FrameKind::Cmd,
            op: cmd::SPEED,
            mode: 0,
            payload,
        }
    }

    /// SELECT command for the given mode.
    #[must_use]
    pub fn select(mode: u8) -> Self {
        Self::cmd_byte(cmd::SELECT, mode)
    }

    /// EXT_MODE command carrying the mode index extension (0 or 8).
    #[must_use]
    pub fn ext_mode(extension: u8) -> Self {
        Self::cmd_byte(cmd::EXT_MODE, extension)
    }

    /// INFO frame for `mode` with the given sub-kind.
    ///
    /// # Errors
    ///
    /// `BadLength` when the payload is empty or longer than 32 bytes.
    pub fn info(mode: u8, sub: u8, payload: &[u8]) -> ProtocolResult<Self> {
        Ok(Self {
            kind: FrameKind::Info,
            op: sub,
            mode,
            payload: padded(payload)?,
        })
    }

    /// DATA frame for `mode` (low 3 bits only), padded to a power of two.
    ///
    /// # Errors
    ///
    /// `BadLength` when the payload is empty or longer than 32 bytes.
    pub fn data(mode: u8, payload: &[u8]) -> ProtocolResult<Self> {
        Ok(Self {
            kind: FrameKind::Data,
            op: 0,
            mode: mode & 0x07,
            payload: padded(payload)?,
        })
    }

    /// Header byte for this frame.
    ///
    /// # Errors
    ///
    /// `BadLength` when the stored payload length is not a valid frame
    /// payload size.
    pub fn header(&self) -> ProtocolResult<u8> {
        match self.kind {
            FrameKind::Sys => Ok(self.op),
            FrameKind::Cmd => {
                Ok(self.kind.bits() | size_field(self.payload.len())? | (self.op & 0x07))
            }
            FrameKind::Info | FrameKind::Data => {
                Ok(self.kind.bits() | size_field(self.payload.len())? | (self.mode & 0x07))
            }
        }
    }

    /// Whether this is the single-byte ACK frame.
    #[must_use]
    pub fn is_ack(&self) -> bool {
        self.kind == FrameKind::Sys && self.op == sys::ACK
    }

    /// Whether this is the single-byte NACK frame.
    #[must_use]
    pub fn is_nack(&self) -> bool {
        self.kind == FrameKind::Sys && self.op == sys::NACK
    }
}

/// Size field (header bits 5:3) for an exact power-of-two length.
const fn size_field(len: usize) -> ProtocolResult<u8> {
    match len {
        1 => Ok(0 << 3),
        2 => Ok(1 << 3),
        4 => Ok(2 << 3),
        8 => Ok(3 << 3),
        16 => Ok(4 << 3),
        32 => Ok(5 << 3),
        _ => Err(ProtocolError::BadLength),
    }
}

/// Copy `bytes` into a payload zero-padded to the next power of two.
fn padded(bytes: &[u8]) -> ProtocolResult<Payload> {
    if bytes.is_empty() || bytes.len() > MAX_PAYLOAD {
        return Err(ProtocolError::BadLength);
    }
    let target = bytes.len().next_power_of_two();
    let mut payload = Payload::new();
    for &b in bytes {
        // capacity checked above
        let _ = payload.push(b);
    }
    while payload.len() < target {
        let _ = payload.push(0);
    }
    Ok(payload)
}
