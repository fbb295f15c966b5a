//! Keep-alive supervisor
//!
//! Once a device streams data, the hub must keep poking it: a NACK every
//! keep-alive period tells the peer to keep transmitting, and a watchdog
//! trips when the peer goes quiet. Both timers run against the poll
//! loop's `now`; the supervisor itself never touches the UART, it only
//! tells the port what is due.

use crate::hal::clock::{Instant, Timer};

/// What the supervisor wants done this poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorEvent {
    /// A keep-alive NACK is due
    NackDue,
    /// The watchdog expired without data
    Stalled,
}

/// Keep-alive and watchdog timers for one port.
#[derive(Debug)]
pub struct Supervisor {
    keepalive: Timer,
    watchdog: Timer,
    keepalive_ms: u32,
    watchdog_ms: u32,
}

impl Supervisor {
    /// Create a stopped supervisor with the given periods.
    #[must_use]
    pub fn new(keepalive_ms: u32, watchdog_ms: u32) -> Self {
        Self {
            keepalive: Timer::new(),
            watchdog: Timer::new(),
            keepalive_ms,
            watchdog_ms,
        }
    }

    /// Arm both timers; called when the port reaches the streaming states.
    pub fn start(&mut self, now: Instant) {
        self.keepalive.set(now, self.keepalive_ms);
        self.watchdog.set(now, self.watchdog_ms);
    }

    /// Disarm both timers; called on teardown.
    pub fn stop(&mut self) {
        self.keepalive.cancel();
        self.watchdog.cancel();
    }

    /// Whether the supervisor is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.watchdog.is_armed()
    }

    /// Feed the watchdog; called for every accepted DATA frame.
    pub fn on_data(&mut self, now: Instant) {
        self.watchdog.restart(now);
    }

    /// Check the timers. The watchdog outranks the keep-alive: a stalled
    /// peer is reported even when a NACK also happens to be due.
    pub fn poll(&mut self, now: Instant) -> Option<SupervisorEvent> {
        if self.watchdog.is_expired(now) {
            return Some(SupervisorEvent::Stalled);
        }
        if self.keepalive.is_expired(now) {
            self.keepalive.restart(now);
            return Some(SupervisorEvent::NackDue);
        }
        None
    }
}
