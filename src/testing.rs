//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the port driver
//! on the host without hardware access, plus byte streams captured from
//! real Powered Up devices with a logic analyzer.
//!
//! Only available when running `cargo test`.

#![cfg(test)]
#![allow(missing_docs)]

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::error::IoResult;
use crate::hal::clock::{Clock, Instant};
use crate::hal::uart::{BAUD_RATE_HIGH, UartDevice};

// =============================================================================
// Mock UART
// =============================================================================

#[derive(Debug, Default)]
struct MockUartInner {
    baud: u32,
    rx: VecDeque<u8>,
    /// Write handed over by the driver, still "draining"
    tx: Option<Vec<u8>>,
    /// Every completed write, in order
    write_log: Vec<Vec<u8>>,
    /// Complete writes immediately instead of waiting for the test
    auto_complete: bool,
}

/// Mock UART for driving the port without hardware.
///
/// Writes stay pending until the test consumes them with
/// [`UartHandle::complete_tx`], mirroring a transmitter that is busy
/// until the line drains (enable auto-complete when a test does not care
/// about transmit ordering).
///
/// # Example
///
/// ```ignore
/// let (uart, handle) = MockUart::new();
/// let mut port = Port::new(uart, PortConfig::default());
/// handle.inject(&[0x40, 0x25, 0x9A]);
/// port.poll(clock.now());
/// ```
#[derive(Debug)]
pub struct MockUart {
    inner: Rc<RefCell<MockUartInner>>,
}

/// Test-side handle to a [`MockUart`] owned by a port.
#[derive(Debug, Clone)]
pub struct UartHandle {
    inner: Rc<RefCell<MockUartInner>>,
}

impl MockUart {
    /// Create a mock UART and its test handle.
    pub fn new() -> (Self, UartHandle) {
        let inner = Rc::new(RefCell::new(MockUartInner {
            baud: BAUD_RATE_HIGH,
            ..MockUartInner::default()
        }));
        (
            Self {
                inner: inner.clone(),
            },
            UartHandle { inner },
        )
    }
}

impl UartDevice for MockUart {
    fn set_baud(&mut self, baud: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.baud = baud;
        // a baud change scrambles whatever was mid-flight
        inner.rx.clear();
    }

    fn baud(&self) -> u32 {
        self.inner.borrow().baud
    }

    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let mut inner = self.inner.borrow_mut();
        let mut count = 0;
        while count < buf.len() {
            match inner.rx.pop_front() {
                Some(b) => {
                    buf[count] = b;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn write(&mut self, bytes: &[u8]) -> IoResult<()> {
        let mut inner = self.inner.borrow_mut();
        assert!(inner.tx.is_none(), "write while transmitter busy");
        if inner.auto_complete {
            inner.write_log.push(bytes.to_vec());
        } else {
            inner.tx = Some(bytes.to_vec());
        }
        Ok(())
    }

    fn write_busy(&self) -> bool {
        self.inner.borrow().tx.is_some()
    }

    fn flush(&mut self) {
        self.inner.borrow_mut().rx.clear();
    }
}

impl UartHandle {
    /// Current line baud rate.
    pub fn baud(&self) -> u32 {
        self.inner.borrow().baud
    }

    /// Queue received bytes for the driver to read.
    pub fn inject(&self, bytes: &[u8]) {
        self.inner.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Peek at the write currently draining, if any.
    pub fn pending_tx(&self) -> Option<Vec<u8>> {
        self.inner.borrow().tx.clone()
    }

    /// Complete the pending write and return its bytes.
    pub fn complete_tx(&self) -> Option<Vec<u8>> {
        let mut inner = self.inner.borrow_mut();
        let tx = inner.tx.take();
        if let Some(bytes) = &tx {
            inner.write_log.push(bytes.clone());
        }
        tx
    }

    /// All completed writes so far.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.borrow().write_log.clone()
    }

    /// Forget the write log.
    pub fn clear_writes(&self) {
        self.inner.borrow_mut().write_log.clear();
    }

    /// Complete writes as soon as the driver issues them.
    pub fn set_auto_complete(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.auto_complete = enabled;
        if enabled {
            if let Some(bytes) = inner.tx.take() {
                inner.write_log.push(bytes);
            }
        }
    }

    /// Whether the driver has unread receive bytes left.
    pub fn rx_pending(&self) -> bool {
        !self.inner.borrow().rx.is_empty()
    }
}

// =============================================================================
// Test Clock
// =============================================================================

/// Manually advanced millisecond clock.
#[derive(Debug, Default)]
pub struct TestClock {
    ticks: core::cell::Cell<u32>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn tick(&self, ms: u32) {
        self.ticks.set(self.ticks.get().wrapping_add(ms));
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.ticks.get())
    }
}

// =============================================================================
// Captured Device Streams
// =============================================================================

/// Byte streams captured from real devices with a logic analyzer.
///
/// Each sync stream is the full self-description a device transmits
/// during the handshake, ending in its ACK.
pub mod captures {
    /// SPEED request for 115200 baud, as transmitted by the hub.
    pub const SPEED_115200: &[u8] = &[0x52, 0x00, 0xC2, 0x01, 0x00, 0x6E];
    /// Single-byte ACK.
    pub const ACK: &[u8] = &[0x04];
    /// Single-byte NACK (keep-alive).
    pub const NACK: &[u8] = &[0x02];

    // =========================================================================
    // BOOST Color and Distance Sensor (type 37, 11 modes, syncs at 2400)
    // =========================================================================

    /// Self-description of the BOOST Color and Distance Sensor.
    pub const COLOR_DISTANCE_SYNC: &[&[u8]] = &[
        &[0x40, 0x25, 0x9A],
        &[0x51, 0x07, 0x07, 0x0A, 0x07, 0xA3],
        &[0x52, 0x00, 0xC2, 0x01, 0x00, 0x6E],
        &[0x5F, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x10, 0xA0],
        &[0x9A, 0x20, 0x43, 0x41, 0x4C, 0x49, 0x42, 0x00, 0x00, 0x00, 0x00],
        &[0x9A, 0x21, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0x83],
        &[0x9A, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xCD],
        &[0x9A, 0x23, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0x81],
        &[0x92, 0x24, 0x4E, 0x2F, 0x41, 0x00, 0x69],
        &[0x8A, 0x25, 0x10, 0x00, 0x40],
        &[0x92, 0xA0, 0x08, 0x01, 0x05, 0x00, 0xC1],
        &[0x99, 0x20, 0x44, 0x45, 0x42, 0x55, 0x47, 0x00, 0x00, 0x00, 0x17],
        &[0x99, 0x21, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x7F, 0x44, 0xBC],
        &[0x99, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xCE],
        &[0x99, 0x23, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x24],
        &[0x91, 0x24, 0x4E, 0x2F, 0x41, 0x00, 0x6A],
        &[0x89, 0x25, 0x10, 0x00, 0x43],
        &[0x91, 0xA0, 0x02, 0x01, 0x05, 0x00, 0xC8],
        &[0x98, 0x20, 0x53, 0x50, 0x45, 0x43, 0x20, 0x31, 0x00, 0x00, 0x53],
        &[0x98, 0x21, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7F, 0x43, 0x7A],
        &[0x98, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xCF],
        &[0x98, 0x23, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7F, 0x43, 0x78],
        &[0x90, 0x24, 0x4E, 0x2F, 0x41, 0x00, 0x6B],
        &[0x88, 0x25, 0x00, 0x00, 0x52],
        &[0x90, 0xA0, 0x04, 0x00, 0x03, 0x00, 0xC8],
        &[0x9F, 0x00, 0x49, 0x52, 0x20, 0x54, 0x78, 0x00, 0x00, 0x00, 0x77],
        &[0x9F, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA6],
        &[0x9F, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xE8],
        &[0x9F, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA4],
        &[0x97, 0x04, 0x4E, 0x2F, 0x41, 0x00, 0x4C],
        &[0x8F, 0x05, 0x00, 0x04, 0x71],
        &[0x97, 0x80, 0x01, 0x01, 0x05, 0x00, 0xED],
        &[0x9E, 0x00, 0x52, 0x47, 0x42, 0x20, 0x49, 0x00, 0x00, 0x00, 0x5F],
        &[0x9E, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x7F, 0x44, 0x9B],
        &[0x9E, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xE9],
        &[0x9E, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x7F, 0x44, 0x99],
        &[0x96, 0x04, 0x52, 0x41, 0x57, 0x00, 0x29],
        &[0x8E, 0x05, 0x10, 0x00, 0x64],
        &[0x96, 0x80, 0x03, 0x01, 0x05, 0x00, 0xEE],
        &[0x9D, 0x00, 0x43, 0x4F, 0x4C, 0x20, 0x4F, 0x00, 0x00, 0x00, 0x4D],
        &[0x9D, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x02],
        &[0x9D, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEA],
        &[0x9D, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x00],
        &[0x95, 0x04, 0x49, 0x44, 0x58, 0x00, 0x3B],
        &[0x8D, 0x05, 0x00, 0x04, 0x73],
        &[0x95, 0x80, 0x01, 0x00, 0x03, 0x00, 0xE8],
        &[0x94, 0x00, 0x41, 0x4D, 0x42, 0x49, 0x6C],
        &[0x9C, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xE8],
        &[0x9C, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEB],
        &[0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEA],
        &[0x94, 0x04, 0x50, 0x43, 0x54, 0x00, 0x28],
        &[0x8C, 0x05, 0x10, 0x00, 0x66],
        &[0x94, 0x80, 0x01, 0x00, 0x03, 0x00, 0xE9],
        &[0x9B, 0x00, 0x52, 0x45, 0x46, 0x4C, 0x54, 0x00, 0x00, 0x00, 0x2D],
        &[0x9B, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEF],
        &[0x9B, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEC],
        &[0x9B, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xED],
        &[0x93, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2F],
        &[0x8B, 0x05, 0x10, 0x00, 0x61],
        &[0x93, 0x80, 0x01, 0x00, 0x03, 0x00, 0xEE],
        &[0x9A, 0x00, 0x43, 0x4F, 0x55, 0x4E, 0x54, 0x00, 0x00, 0x00, 0x26],
        &[0x9A, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEE],
        &[0x9A, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xED],
        &[0x9A, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEC],
        &[0x92, 0x04, 0x43, 0x4E, 0x54, 0x00, 0x30],
        &[0x8A, 0x05, 0x08, 0x00, 0x78],
        &[0x92, 0x80, 0x01, 0x02, 0x04, 0x00, 0xEA],
        &[0x91, 0x00, 0x50, 0x52, 0x4F, 0x58, 0x7B],
        &[0x99, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x06],
        &[0x99, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEE],
        &[0x99, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x04],
        &[0x91, 0x04, 0x44, 0x49, 0x53, 0x00, 0x34],
        &[0x89, 0x05, 0x50, 0x00, 0x23],
        &[0x91, 0x80, 0x01, 0x00, 0x03, 0x00, 0xEC],
        &[0x98, 0x00, 0x43, 0x4F, 0x4C, 0x4F, 0x52, 0x00, 0x00, 0x00, 0x3A],
        &[0x98, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x07],
        &[0x98, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEF],
        &[0x98, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x41, 0x05],
        &[0x90, 0x04, 0x49, 0x44, 0x58, 0x00, 0x3E],
        &[0x88, 0x05, 0xC4, 0x00, 0xB6],
        &[0x90, 0x80, 0x01, 0x00, 0x03, 0x00, 0xED],
        &[0x88, 0x06, 0x4F, 0x00, 0x3E],
        &[0x04],
    ];

    /// SELECT of the color sensor's default mode (6, RGB I).
    pub const COLOR_DISTANCE_SELECT_DEFAULT: &[u8] = &[0x43, 0x06, 0xBA];
    /// EXT_MODE announcement preceding non-extended data.
    pub const EXT_MODE_INFO_0: &[u8] = &[0x46, 0x00, 0xB9];
    /// EXT_MODE announcement preceding extended-mode data.
    pub const EXT_MODE_INFO_8: &[u8] = &[0x46, 0x08, 0xB1];
    /// Mode 6 DATA frame (3 × i16, all zero).
    pub const COLOR_DISTANCE_DATA_MODE6: &[u8] = &[
        0xDE, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x21,
    ];
    /// SELECT of mode 1.
    pub const SELECT_MODE1: &[u8] = &[0x43, 0x01, 0xBD];
    /// Mode 1 DATA frame.
    pub const DATA_MODE1: &[u8] = &[0xC1, 0x00, 0x3E];
    /// SELECT of mode 8 (needs the EXT_MODE prefix).
    pub const SELECT_MODE8: &[u8] = &[0x43, 0x08, 0xB4];
    /// EXT_MODE command for modes 8 and above.
    pub const EXT_MODE_8: &[u8] = &[0x46, 0x08, 0xB1];
    /// Mode 8 DATA frame (header mode bits 0, extension 8).
    pub const DATA_MODE8: &[u8] = &[0xD0, 0x00, 0x00, 0x00, 0x00, 0x2F];

    // =========================================================================
    // BOOST Interactive Motor (type 38, 4 modes, syncs at 2400)
    // =========================================================================

    /// Self-description of the BOOST Interactive Motor.
    pub const INTERACTIVE_MOTOR_SYNC: &[&[u8]] = &[
        &[0x40, 0x26, 0x99],
        &[0x49, 0x03, 0x02, 0xB7],
        &[0x52, 0x00, 0xC2, 0x01, 0x00, 0x6E],
        &[0x5F, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x10, 0xA0],
        &[0x93, 0x00, 0x54, 0x45, 0x53, 0x54, 0x7A],
        &[0x9B, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x9B, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE6],
        &[0x9B, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x93, 0x04, 0x54, 0x53, 0x54, 0x00, 0x3B],
        &[0x8B, 0x05, 0x00, 0x00, 0x71],
        &[0x93, 0x80, 0x05, 0x01, 0x06, 0x00, 0xEE],
        &[0x92, 0x00, 0x50, 0x4F, 0x53, 0x00, 0x21],
        &[0x9A, 0x01, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE4],
        &[0x9A, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x9A, 0x03, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE6],
        &[0x92, 0x04, 0x44, 0x45, 0x47, 0x00, 0x2F],
        &[0x8A, 0x05, 0x08, 0x00, 0x78],
        &[0x92, 0x80, 0x01, 0x02, 0x06, 0x00, 0xE8],
        &[0x99, 0x00, 0x53, 0x50, 0x45, 0x45, 0x44, 0x00, 0x00, 0x00, 0x21],
        &[0x99, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x99, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x99, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x91, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2D],
        &[0x89, 0x05, 0x10, 0x00, 0x63],
        &[0x91, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEB],
        &[0x98, 0x00, 0x50, 0x4F, 0x57, 0x45, 0x52, 0x00, 0x00, 0x00, 0x38],
        &[0x98, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE6],
        &[0x98, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x98, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x90, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2C],
        &[0x88, 0x05, 0x00, 0x50, 0x22],
        &[0x90, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEA],
        &[0x88, 0x06, 0x06, 0x00, 0x77],
        &[0x04],
    ];

    /// SELECT of the interactive motor's default mode (2, POS).
    pub const INTERACTIVE_MOTOR_SELECT_DEFAULT: &[u8] = &[0x43, 0x02, 0xBE];
    /// Mode 2 DATA frame (angle 0).
    pub const INTERACTIVE_MOTOR_DATA_MODE2: &[u8] = &[0xD2, 0x00, 0x00, 0x00, 0x00, 0x2D];

    // =========================================================================
    // Technic Large Linear Motor (type 46, 6 modes, syncs at 115200)
    // =========================================================================

    /// Self-description of the Technic Large Linear Motor.
    pub const TECHNIC_LARGE_SYNC: &[&[u8]] = &[
        &[0x40, 0x2E, 0x91],
        &[0x49, 0x05, 0x03, 0xB0],
        &[0x52, 0x00, 0xC2, 0x01, 0x00, 0x6E],
        &[0x5F, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xB4],
        &[
            0xA5, 0x00, 0x53, 0x54, 0x41, 0x54, 0x53, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x1A,
        ],
        &[0x9D, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA4],
        &[0x9D, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEA],
        &[0x9D, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA6],
        &[0x95, 0x04, 0x4D, 0x49, 0x4E, 0x00, 0x24],
        &[0x8D, 0x05, 0x00, 0x00, 0x77],
        &[0x95, 0x80, 0x0E, 0x01, 0x05, 0x00, 0xE0],
        &[
            0xA4, 0x00, 0x43, 0x41, 0x4C, 0x49, 0x42, 0x00, 0x22, 0x40, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x7D,
        ],
        &[0x9C, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x61, 0x45, 0x46],
        &[0x9C, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEB],
        &[0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x61, 0x45, 0x44],
        &[0x94, 0x04, 0x43, 0x41, 0x4C, 0x00, 0x21],
        &[0x8C, 0x05, 0x00, 0x00, 0x76],
        &[0x94, 0x80, 0x02, 0x01, 0x05, 0x00, 0xED],
        &[
            0xA3, 0x00, 0x41, 0x50, 0x4F, 0x53, 0x00, 0x00, 0x22, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x72,
        ],
        &[0x9B, 0x01, 0x00, 0x00, 0x34, 0xC3, 0x00, 0x00, 0x33, 0x43, 0xE2],
        &[0x9B, 0x02, 0x00, 0x00, 0x48, 0xC3, 0x00, 0x00, 0x48, 0x43, 0xE6],
        &[0x9B, 0x03, 0x00, 0x00, 0x34, 0xC3, 0x00, 0x00, 0x33, 0x43, 0xE0],
        &[0x93, 0x04, 0x44, 0x45, 0x47, 0x00, 0x2E],
        &[0x8B, 0x05, 0x32, 0x32, 0x71],
        &[0x93, 0x80, 0x01, 0x01, 0x03, 0x00, 0xEF],
        &[
            0xA2, 0x00, 0x50, 0x4F, 0x53, 0x00, 0x00, 0x00, 0x24, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x34,
        ],
        &[0x9A, 0x01, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE4],
        &[0x9A, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x9A, 0x03, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE6],
        &[0x92, 0x04, 0x44, 0x45, 0x47, 0x00, 0x2F],
        &[0x8A, 0x05, 0x28, 0x68, 0x30],
        &[0x92, 0x80, 0x01, 0x02, 0x0B, 0x00, 0xE5],
        &[
            0xA1, 0x00, 0x53, 0x50, 0x45, 0x45, 0x44, 0x00, 0x21, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x39,
        ],
        &[0x99, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x99, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x99, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x91, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2D],
        &[0x89, 0x05, 0x30, 0x70, 0x33],
        &[0x91, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEB],
        &[
            0xA0, 0x00, 0x50, 0x4F, 0x57, 0x45, 0x52, 0x00, 0x30, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x31,
        ],
        &[0x98, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE6],
        &[0x98, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x98, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x90, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2C],
        &[0x88, 0x05, 0x00, 0x50, 0x22],
        &[0x90, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEA],
        &[0x88, 0x06, 0x0E, 0x00, 0x7F],
        &[
            0xA0, 0x08, 0x00, 0x40, 0x00, 0x2E, 0x09, 0x47, 0x38, 0x33, 0x36, 0x36, 0x36, 0x30,
            0x00, 0x00, 0x00, 0x00, 0x7A,
        ],
        &[
            0xA0, 0x09, 0x88, 0x13, 0x00, 0x00, 0xFA, 0x00, 0x00, 0x00, 0x10, 0x27, 0x00, 0x00,
            0xBE, 0x05, 0x00, 0x00, 0xBB,
        ],
        &[
            0xA0, 0x0A, 0x98, 0x3A, 0x00, 0x00, 0x96, 0x00, 0x00, 0x00, 0x98, 0x3A, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0xC3,
        ],
        &[0x98, 0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6C],
        &[0x90, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x63],
        &[0x04],
    ];

    /// SELECT of the Technic motors' default mode (4, CALIB).
    pub const TECHNIC_SELECT_DEFAULT: &[u8] = &[0x43, 0x04, 0xB8];
    /// Mode 4 DATA frame (2 × i16, zero).
    pub const TECHNIC_DATA_MODE4: &[u8] = &[0xD4, 0x00, 0x00, 0x00, 0x00, 0x2B];

    // =========================================================================
    // Technic XL Linear Motor (type 47, 6 modes, syncs at 115200)
    // =========================================================================

    /// Self-description of the Technic XL Linear Motor. Identical mode
    /// table to the large motor; only the type, versions, and motor
    /// calibration blobs differ.
    pub const TECHNIC_XL_SYNC: &[&[u8]] = &[
        &[0x40, 0x2F, 0x90],
        &[0x49, 0x05, 0x03, 0xB0],
        &[0x52, 0x00, 0xC2, 0x01, 0x00, 0x6E],
        &[0x5F, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xB4],
        &[
            0xA5, 0x00, 0x53, 0x54, 0x41, 0x54, 0x53, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x1A,
        ],
        &[0x9D, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA4],
        &[0x9D, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEA],
        &[0x9D, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x7F, 0x47, 0xA6],
        &[0x95, 0x04, 0x4D, 0x49, 0x4E, 0x00, 0x24],
        &[0x8D, 0x05, 0x00, 0x00, 0x77],
        &[0x95, 0x80, 0x0E, 0x01, 0x05, 0x00, 0xE0],
        &[
            0xA4, 0x00, 0x43, 0x41, 0x4C, 0x49, 0x42, 0x00, 0x22, 0x40, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x7D,
        ],
        &[0x9C, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x61, 0x45, 0x46],
        &[0x9C, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x42, 0xEB],
        &[0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x61, 0x45, 0x44],
        &[0x94, 0x04, 0x43, 0x41, 0x4C, 0x00, 0x21],
        &[0x8C, 0x05, 0x00, 0x00, 0x76],
        &[0x94, 0x80, 0x02, 0x01, 0x05, 0x00, 0xED],
        &[
            0xA3, 0x00, 0x41, 0x50, 0x4F, 0x53, 0x00, 0x00, 0x22, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x72,
        ],
        &[0x9B, 0x01, 0x00, 0x00, 0x34, 0xC3, 0x00, 0x00, 0x33, 0x43, 0xE2],
        &[0x9B, 0x02, 0x00, 0x00, 0x48, 0xC3, 0x00, 0x00, 0x48, 0x43, 0xE6],
        &[0x9B, 0x03, 0x00, 0x00, 0x34, 0xC3, 0x00, 0x00, 0x33, 0x43, 0xE0],
        &[0x93, 0x04, 0x44, 0x45, 0x47, 0x00, 0x2E],
        &[0x8B, 0x05, 0x32, 0x32, 0x71],
        &[0x93, 0x80, 0x01, 0x01, 0x03, 0x00, 0xEF],
        &[
            0xA2, 0x00, 0x50, 0x4F, 0x53, 0x00, 0x00, 0x00, 0x24, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x34,
        ],
        &[0x9A, 0x01, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE4],
        &[0x9A, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x9A, 0x03, 0x00, 0x00, 0xB4, 0xC3, 0x00, 0x00, 0xB4, 0x43, 0xE6],
        &[0x92, 0x04, 0x44, 0x45, 0x47, 0x00, 0x2F],
        &[0x8A, 0x05, 0x28, 0x68, 0x30],
        &[0x92, 0x80, 0x01, 0x02, 0x0B, 0x00, 0xE5],
        &[
            0xA1, 0x00, 0x53, 0x50, 0x45, 0x45, 0x44, 0x00, 0x21, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x39,
        ],
        &[0x99, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE7],
        &[0x99, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x99, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x91, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2D],
        &[0x89, 0x05, 0x30, 0x70, 0x33],
        &[0x91, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEB],
        &[
            0xA0, 0x00, 0x50, 0x4F, 0x57, 0x45, 0x52, 0x00, 0x30, 0x00, 0x00, 0x00, 0x05, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x31,
        ],
        &[0x98, 0x01, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE6],
        &[0x98, 0x02, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE5],
        &[0x98, 0x03, 0x00, 0x00, 0xC8, 0xC2, 0x00, 0x00, 0xC8, 0x42, 0xE4],
        &[0x90, 0x04, 0x50, 0x43, 0x54, 0x00, 0x2C],
        &[0x88, 0x05, 0x00, 0x50, 0x22],
        &[0x90, 0x80, 0x01, 0x00, 0x04, 0x00, 0xEA],
        &[0x88, 0x06, 0x0E, 0x00, 0x7F],
        &[
            0xA0, 0x08, 0x80, 0x21, 0x00, 0x1C, 0x16, 0x47, 0x38, 0x34, 0x34, 0x38, 0x35, 0x32,
            0x00, 0x00, 0x00, 0x00, 0xBC,
        ],
        &[
            0xA0, 0x09, 0x28, 0x23, 0x00, 0x00, 0xFA, 0x00, 0x00, 0x00, 0x28, 0x23, 0x00, 0x00,
            0xF5, 0x05, 0x00, 0x00, 0x5C,
        ],
        &[
            0xA0, 0x0A, 0xF8, 0x2A, 0x00, 0x00, 0x78, 0x00, 0x00, 0x00, 0xC8, 0xAF, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x98,
        ],
        &[0x98, 0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6C],
        &[0x90, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x63],
        &[0x04],
    ];
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::codec;

    #[test]
    fn mock_uart_read_write() {
        let (mut uart, handle) = MockUart::new();

        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf).unwrap(), 0);

        handle.inject(&[1, 2, 3]);
        assert_eq!(uart.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);

        uart.write(&[9, 8]).unwrap();
        assert!(uart.write_busy());
        assert_eq!(handle.pending_tx().unwrap(), &[9, 8]);
        assert_eq!(handle.complete_tx().unwrap(), &[9, 8]);
        assert!(!uart.write_busy());
        assert_eq!(handle.writes(), [&[9, 8]]);
    }

    #[test]
    fn mock_uart_read_is_bounded_by_buf() {
        let (mut uart, handle) = MockUart::new();
        handle.inject(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(uart.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert!(handle.rx_pending());
    }

    #[test]
    fn mock_uart_baud_change_clears_rx() {
        let (mut uart, handle) = MockUart::new();
        handle.inject(&[1, 2, 3]);
        uart.set_baud(2_400);

        assert_eq!(handle.baud(), 2_400);
        assert!(!handle.rx_pending());
    }

    #[test]
    fn mock_uart_auto_complete() {
        let (mut uart, handle) = MockUart::new();
        handle.set_auto_complete(true);

        uart.write(&[1]).unwrap();
        uart.write(&[2]).unwrap();
        assert!(!uart.write_busy());
        assert_eq!(handle.writes(), [&[1], &[2]]);
    }

    #[test]
    fn test_clock_ticks() {
        let clock = TestClock::new();
        assert_eq!(clock.now().ticks(), 0);
        clock.tick(5);
        clock.tick(1);
        assert_eq!(clock.now().ticks(), 6);
    }

    #[test]
    fn captured_streams_decode_cleanly() {
        let streams = [
            captures::COLOR_DISTANCE_SYNC,
            captures::INTERACTIVE_MOTOR_SYNC,
            captures::TECHNIC_LARGE_SYNC,
            captures::TECHNIC_XL_SYNC,
        ];
        for stream in streams {
            for bytes in stream {
                match codec::decode(bytes).unwrap() {
                    codec::Decoded::Frame(_) => {}
                    codec::Decoded::NeedMore(n) => {
                        panic!("capture {:02X?} incomplete, missing {}", bytes, n)
                    }
                }
            }
        }
    }
}
