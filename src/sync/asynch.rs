//! Async/await support for port operations.
//!
//! Provides futures and per-port waker storage on top of
//! [`SharedPort`]. One context keeps calling
//! [`SharedPort::poll_and_notify`] (a timer interrupt or a dedicated
//! task); async tasks await readiness and samples without polling in a
//! busy loop.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use super::primitives::AtomicWaker;
use super::shared::SharedPort;
use crate::driver::config::PortState;
use crate::error::Error;
use crate::hal::clock::Instant;
use crate::hal::uart::UartDevice;
use crate::proto::msg::MAX_PAYLOAD;

/// Per-port async state.
///
/// Store this in static memory next to the [`SharedPort`] and pass a
/// reference to the poll loop and to async operations.
pub struct AsyncPortState {
    ready_waker: AtomicWaker,
    sample_waker: AtomicWaker,
}

impl AsyncPortState {
    /// Create a new async state.
    pub const fn new() -> Self {
        Self {
            ready_waker: AtomicWaker::new(),
            sample_waker: AtomicWaker::new(),
        }
    }

    /// Wake tasks based on the state of the last poll.
    ///
    /// Called by [`SharedPort::poll_and_notify`]; call it yourself when
    /// driving a bare [`crate::Port`].
    pub fn on_poll(&self, state: PortState, new_sample: bool) {
        self.notify(state, new_sample);
    }

    pub(crate) fn notify(&self, state: PortState, new_sample: bool) {
        if state == PortState::Ready {
            self.ready_waker.wake();
        }
        if new_sample {
            self.sample_waker.wake();
        }
        if matches!(state, PortState::Errored | PortState::Detached) {
            // let waiting tasks re-evaluate against the torn-down port
            self.ready_waker.wake();
            self.sample_waker.wake();
        }
    }

    /// Wake all registered tasks (call when replacing the port).
    pub fn reset(&self) {
        self.ready_waker.wake();
        self.sample_waker.wake();
    }
}

impl Default for AsyncPortState {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned copy of one received sample, detached from the port borrow.
#[derive(Debug, Clone, Copy)]
pub struct SampleSnapshot {
    /// Mode the sample was measured in
    pub mode: u8,
    /// When the sample was received
    pub timestamp: Instant,
    len: usize,
    bytes: [u8; MAX_PAYLOAD],
}

impl SampleSnapshot {
    /// Raw payload bytes, trimmed to the mode's value format.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Future resolving when the port is streaming data.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ReadyFuture<'a, U: UartDevice> {
    port: &'a SharedPort<U>,
    state: &'a AsyncPortState,
}

impl<U: UartDevice> Future for ReadyFuture<'_, U> {
    type Output = Result<(), Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.port.with(|port| port.is_ready()) {
            Some(Ok(())) => return Poll::Ready(Ok(())),
            Some(Err(nb::Error::Other(err))) => return Poll::Ready(Err(err)),
            Some(Err(nb::Error::WouldBlock)) | None => {}
        }
        self.state.ready_waker.register(cx.waker());
        // a wake between the check and the registration would be lost,
        // so look again
        match self.port.with(|port| port.is_ready()) {
            Some(Ok(())) => Poll::Ready(Ok(())),
            Some(Err(nb::Error::Other(err))) => Poll::Ready(Err(err)),
            Some(Err(nb::Error::WouldBlock)) | None => Poll::Pending,
        }
    }
}

/// Future resolving with the next sample not seen before.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SampleFuture<'a, U: UartDevice> {
    port: &'a SharedPort<U>,
    state: &'a AsyncPortState,
    seen: u32,
}

impl<U: UartDevice> SampleFuture<'_, U> {
    fn take_fresh(&self) -> Option<SampleSnapshot> {
        self.port
            .with(|port| {
                if port.sample_count() == self.seen {
                    return None;
                }
                let sample = port.sample(None).ok()?;
                let mut bytes = [0u8; MAX_PAYLOAD];
                bytes[..sample.raw().len()].copy_from_slice(sample.raw());
                Some(SampleSnapshot {
                    mode: sample.mode(),
                    timestamp: sample.timestamp(),
                    len: sample.raw().len(),
                    bytes,
                })
            })
            .flatten()
    }
}

impl<U: UartDevice> Future for SampleFuture<'_, U> {
    type Output = SampleSnapshot;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(snapshot) = self.take_fresh() {
            return Poll::Ready(snapshot);
        }
        self.state.sample_waker.register(cx.waker());
        match self.take_fresh() {
            Some(snapshot) => Poll::Ready(snapshot),
            None => Poll::Pending,
        }
    }
}

/// Extension trait providing async methods for a shared port.
pub trait AsyncPortExt<U: UartDevice> {
    /// Wait until the port is streaming data in the active mode.
    fn ready_async<'a>(&'a self, state: &'a AsyncPortState) -> ReadyFuture<'a, U>;

    /// Wait for a sample newer than anything seen so far.
    fn next_sample<'a>(&'a self, state: &'a AsyncPortState) -> SampleFuture<'a, U>;
}

impl<U: UartDevice> AsyncPortExt<U> for SharedPort<U> {
    fn ready_async<'a>(&'a self, state: &'a AsyncPortState) -> ReadyFuture<'a, U> {
        ReadyFuture { port: self, state }
    }

    fn next_sample<'a>(&'a self, state: &'a AsyncPortState) -> SampleFuture<'a, U> {
        let seen = self.with(|port| port.sample_count()).unwrap_or(0);
        SampleFuture {
            port: self,
            state,
            seen,
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================
