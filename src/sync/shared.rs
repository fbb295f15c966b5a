//! ISR-safe port wrapper using critical sections.
//!
//! Provides [`SharedPort`] so one context (a timer or UART interrupt)
//! can poll the driver while another (the main loop or an async task)
//! queries it.

use super::primitives::CriticalSectionCell;
use crate::driver::config::PortState;
use crate::driver::port::Port;
use crate::hal::clock::Instant;
use crate::hal::uart::UartDevice;

#[cfg(feature = "async")]
use super::asynch::AsyncPortState;

/// ISR-safe port wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling
/// interrupts for the duration of the closure. The wrapper starts empty
/// so it can live in a `static`; hand it the port once the UART exists.
///
/// # Example
///
/// ```ignore
/// static PORT: SharedPort<HubUart> = SharedPort::new();
///
/// PORT.init(Port::new(uart, PortConfig::default()));
/// PORT.with(|port| port.set_mode(1));
/// ```
pub struct SharedPort<U: UartDevice> {
    inner: CriticalSectionCell<Option<Port<U>>>,
}

impl<U: UartDevice> SharedPort<U> {
    /// Create an empty wrapper (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Install the port. A previous port, if any, is dropped (which
    /// cancels its transfers).
    pub fn init(&self, port: Port<U>) {
        self.inner.with(|slot| *slot = Some(port));
    }

    /// Whether a port has been installed.
    pub fn is_initialized(&self) -> bool {
        self.inner.with_ref(Option::is_some)
    }

    /// Execute a closure with exclusive access to the port.
    ///
    /// Interrupts are disabled for the duration of the closure. Returns
    /// `None` until [`init`](Self::init) has been called.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Port<U>) -> R,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Try to execute a closure, returning `None` if the cell is busy
    /// or empty.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Port<U>) -> R,
    {
        self.inner
            .try_with(|slot| slot.as_mut().map(f))
            .flatten()
    }

    /// Advance the port tasks; the ISR-side entry point.
    pub fn poll(&self, now: Instant) -> Option<PortState> {
        self.with(|port| {
            port.poll(now);
            port.state()
        })
    }

    /// Advance the port tasks and wake async tasks on status edges and
    /// fresh samples.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub fn poll_and_notify(&self, now: Instant, state: &AsyncPortState) -> Option<PortState> {
        let polled = self.with(|port| {
            let before = port.sample_count();
            port.poll(now);
            (port.state(), port.sample_count() != before)
        })?;
        let (port_state, new_sample) = polled;
        state.notify(port_state, new_sample);
        Some(port_state)
    }
}

impl<U: UartDevice> Default for SharedPort<U> {
    fn default() -> Self {
        Self::new()
    }
}
