//! Error types for the LUMP port driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`DeviceError`]: Caller-facing device and argument failures
//! - [`ProtocolError`]: Wire protocol violations (malformed frames)
//! - [`IoError`]: Runtime UART and supervision failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods. Operations that are correct but not yet
//! complete return `nb::Error::WouldBlock` instead of an error.

// =============================================================================
// Device Errors
// =============================================================================

/// Device and argument errors
///
/// These errors are returned synchronously from the port facade and
/// never change the port state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// No device is attached to the port
    NoDevice,
    /// Attached device type id does not match the caller's expectation
    WrongType,
    /// Mode index out of range for the attached device
    InvalidMode,
    /// Requested mode does not accept written data
    NotWritable,
    /// Supplied data does not fit the mode's value format
    InvalidData,
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DeviceError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceError::NoDevice => "no device attached",
            DeviceError::WrongType => "device type mismatch",
            DeviceError::InvalidMode => "invalid mode index",
            DeviceError::NotWritable => "mode is not writable",
            DeviceError::InvalidData => "data does not match mode format",
        }
    }
}

// =============================================================================
// Protocol Errors
// =============================================================================

/// Wire protocol violations
///
/// These errors mark a frame, or the sync conversation, as malformed.
/// Frame-level violations discard the receive buffer; conversation-level
/// violations (such as an incomplete descriptor set at sync finalize)
/// tear the port down for a full resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Frame checksum mismatch
    BadChecksum,
    /// Header length field encodes a payload larger than 32 bytes
    BadLength,
    /// SYS frame other than SYNC/NACK/ACK
    BadSysFrame,
    /// Payload size does not match the message kind
    BadPayload,
    /// MODES re-declaration tried to shrink the descriptor set
    ModesShrunk,
    /// A declared mode never received its FORMAT message
    MissingFormat,
    /// Frame not valid in the current handshake phase
    UnexpectedFrame,
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProtocolError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProtocolError::BadChecksum => "checksum mismatch",
            ProtocolError::BadLength => "invalid payload length",
            ProtocolError::BadSysFrame => "invalid system frame",
            ProtocolError::BadPayload => "payload does not match message kind",
            ProtocolError::ModesShrunk => "mode count shrank",
            ProtocolError::MissingFormat => "mode missing format info",
            ProtocolError::UnexpectedFrame => "frame unexpected in this phase",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime UART and supervision errors
///
/// These errors occur while exchanging frames with an attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// UART read or write timed out
    Timeout,
    /// Operation was cancelled by closing the port
    Cancelled,
    /// Watchdog expired without a DATA frame
    Stalled,
    /// UART hardware fault
    Hardware,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::Cancelled => "operation cancelled",
            IoError::Stalled => "device stopped sending data",
            IoError::Hardware => "UART hardware fault",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Device(DeviceError::InvalidMode)) => { /* ... */ }
///     Err(Error::Protocol(ProtocolError::BadChecksum)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Device or argument error
    Device(DeviceError),
    /// Wire protocol violation
    Protocol(ProtocolError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Device(e) => write!(f, "device: {}", e.as_str()),
            Error::Protocol(e) => write!(f, "protocol: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for port operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for device/argument checks
pub type DeviceResult<T> = core::result::Result<T, DeviceError>;

/// Result type alias for frame codec operations
pub type ProtocolResult<T> = core::result::Result<T, ProtocolError>;

/// Result type alias for UART operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
