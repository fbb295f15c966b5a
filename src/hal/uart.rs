//! UART device contract
//!
//! The port driver owns exactly one UART per port and talks to it through
//! this trait. The contract is deliberately small and non-blocking: the
//! driver's reader pulls whatever bytes have arrived, the writer hands
//! over at most one frame at a time, and all timeout bookkeeping lives in
//! the driver against the [`crate::hal::clock`] primitives.
//!
//! This trait can be implemented by different backends, allowing the port
//! driver to work with interrupt-driven, DMA-driven, or mocked UARTs.

use crate::error::IoResult;

/// Baud rate used while probing for a device and streaming data on
/// modern Powered Up devices.
pub const BAUD_RATE_HIGH: u32 = 115_200;

/// Bootstrap baud rate of older LUMP devices (EV3-era sensors).
pub const BAUD_RATE_LOW: u32 = 2_400;

/// Half-duplex UART device owned by a single port.
///
/// # Contract
///
/// - [`read`](Self::read) never blocks: it copies bytes that have already
///   arrived and returns how many were copied, `0` when none are pending.
/// - [`write`](Self::write) hands the whole buffer to the transmitter in
///   one call. While the transfer drains, [`write_busy`](Self::write_busy)
///   reports `true`; the driver never starts a second write before the
///   first completes.
/// - [`set_baud`](Self::set_baud) may discard bytes still in the receive
///   FIFO; the driver only changes baud at frame boundaries.
/// - Dropping the device, or the port that owns it, cancels any transfer
///   in flight.
pub trait UartDevice {
    /// Change the line baud rate.
    fn set_baud(&mut self, baud: u32);

    /// Current line baud rate.
    fn baud(&self) -> u32;

    /// Copy pending received bytes into `buf`, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Hardware`](crate::IoError::Hardware) on a
    /// framing or overrun fault; the driver responds by resyncing.
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize>;

    /// Begin transmitting `bytes`.
    ///
    /// Must only be called while [`write_busy`](Self::write_busy) is
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Hardware`](crate::IoError::Hardware) on a
    /// transmitter fault.
    fn write(&mut self, bytes: &[u8]) -> IoResult<()>;

    /// Whether a previously started write is still draining.
    fn write_busy(&self) -> bool;

    /// Discard anything left in the receive FIFO.
    fn flush(&mut self);
}
