//! LUMP port facade
//!
//! One [`Port`] owns one UART and runs the whole lifecycle of the device
//! attached to it: baud probing, the self-description sweep, keep-alive,
//! data reception, and mode switching.
//!
//! # Concurrency model
//!
//! The port is single-threaded and cooperative. [`Port::poll`] advances
//! three logical tasks in a fixed order — reader (frame assembly and
//! dispatch), timers (probe window, partial-frame timeout, keep-alive,
//! watchdog), writer (one outbound frame at a time) — and every task
//! keeps its persistent state in the port struct, so nothing is held
//! across a yield point. Call `poll` from a main loop, a timer tick, or
//! a UART interrupt; queries between polls never block.
//!
//! Outbound frames are FIFO; command frames always precede the next
//! keep-alive NACK. Recovery is automatic and indefinite: any failure
//! tears the port down and restarts baud probing, and callers simply
//! observe "pending" until the device is synced again.

use embedded_hal::delay::DelayNs;
use heapless::Deque;

use crate::descriptor::DeviceDescriptor;
use crate::descriptor::mode::ModeDescriptor;
use crate::driver::config::{PortConfig, PortState};
use crate::driver::supervisor::{Supervisor, SupervisorEvent};
use crate::driver::sync::{IngestEvent, SyncEngine};
use crate::error::{DeviceError, Error, IoError, Result};
use crate::hal::clock::{Clock, Instant, Timer};
use crate::hal::uart::{BAUD_RATE_HIGH, BAUD_RATE_LOW, UartDevice};
use crate::proto::codec::{Decoded, decode, encode};
use crate::proto::msg::{DataType, Frame, FrameKind, MAX_FRAME, MAX_PAYLOAD, cmd, type_id};

/// Outbound frames waiting for the transmitter.
const TX_QUEUE_DEPTH: usize = 4;

type TxBytes = heapless::Vec<u8, MAX_FRAME>;

/// Snapshot of the synced device exposed to callers.
#[derive(Debug, Clone, Copy)]
pub struct PortInfo<'a> {
    /// Number of modes the device declared
    pub num_modes: u8,
    /// Currently active mode
    pub current_mode: u8,
    /// Frozen mode descriptors, indexed by mode
    pub modes: &'a [ModeDescriptor],
}

#[derive(Debug, Clone, Copy)]
struct SampleBuf {
    mode: u8,
    len: usize,
    bytes: [u8; MAX_PAYLOAD],
    timestamp: Instant,
}

/// The most recent sample received from the device.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    mode: u8,
    timestamp: Instant,
    bytes: &'a [u8],
    data_type: DataType,
    num_values: u8,
}

impl<'a> Sample<'a> {
    /// Mode the sample was measured in.
    #[must_use]
    pub fn mode(&self) -> u8 {
        self.mode
    }

    /// When the sample was received.
    #[must_use]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Number of values in the sample.
    #[must_use]
    pub fn num_values(&self) -> u8 {
        self.num_values
    }

    /// Raw payload bytes, trimmed to the mode's value format.
    #[must_use]
    pub fn raw(&self) -> &'a [u8] {
        self.bytes
    }

    /// Integer value at `index`, sign-extended from the mode's element
    /// type. `None` for float modes or an out-of-range index.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<i32> {
        let size = self.data_type.size();
        let at = index * size;
        let bytes = self.bytes.get(at..at + size)?;
        match self.data_type {
            DataType::I8 => Some(i32::from(bytes[0] as i8)),
            DataType::I16 => Some(i32::from(i16::from_le_bytes([bytes[0], bytes[1]]))),
            DataType::I32 => Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
            DataType::F32 => None,
        }
    }

    /// Float value at `index` for float modes.
    #[must_use]
    pub fn value_f32(&self, index: usize) -> Option<f32> {
        if self.data_type != DataType::F32 {
            return None;
        }
        let at = index * 4;
        let bytes = self.bytes.get(at..at + 4)?;
        Some(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Host-side driver for one LUMP port.
///
/// See the [module docs](self) for the concurrency model. Construction
/// is cheap; the handshake starts on the first [`poll`](Self::poll).
pub struct Port<U: UartDevice> {
    uart: U,
    config: PortConfig,
    state: PortState,
    enabled: bool,

    // reader task
    rx_buf: [u8; MAX_FRAME],
    rx_have: usize,
    rx_timer: Timer,

    // writer task
    tx_queue: Deque<TxBytes, TX_QUEUE_DEPTH>,
    nack_due: bool,
    tx_timer: Timer,

    // handshake
    engine: Option<SyncEngine>,
    probe: Timer,
    probing_low: bool,
    target_baud: u32,

    supervisor: Supervisor,

    // device state
    dev: Option<DeviceDescriptor>,
    current_mode: u8,
    requested_mode: Option<u8>,
    ext_mode: u8,
    sample: Option<SampleBuf>,
    sample_seq: u32,
}

impl<U: UartDevice> Port<U> {
    /// Create a port over `uart`. The port starts open and detached; the
    /// first `poll` begins probing for a device.
    pub fn new(uart: U, config: PortConfig) -> Self {
        Self {
            uart,
            config,
            state: PortState::Detached,
            enabled: true,
            rx_buf: [0; MAX_FRAME],
            rx_have: 0,
            rx_timer: Timer::new(),
            tx_queue: Deque::new(),
            nack_due: false,
            tx_timer: Timer::new(),
            engine: None,
            probe: Timer::new(),
            probing_low: false,
            target_baud: BAUD_RATE_HIGH,
            supervisor: Supervisor::new(config.keepalive_ms, config.watchdog_ms),
            dev: None,
            current_mode: 0,
            requested_mode: None,
            ext_mode: 0,
            sample: None,
            sample_seq: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PortState {
        self.state
    }

    /// The frozen device descriptor, once synced.
    #[must_use]
    pub fn device(&self) -> Option<&DeviceDescriptor> {
        self.dev.as_ref()
    }

    /// Stop driving the port: cancels the tasks at this suspension point
    /// and releases the device. Queries return
    /// [`DeviceError::NoDevice`] until [`open`](Self::open).
    pub fn close(&mut self) {
        self.teardown();
        self.enabled = false;
    }

    /// Resume driving a closed port.
    pub fn open(&mut self) {
        self.enabled = true;
    }

    // =========================================================================
    // Cooperative poll loop
    // =========================================================================

    /// Advance the port tasks. Call regularly (every millisecond or on
    /// UART/timer events); `now` must come from a monotonic clock.
    pub fn poll(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        if self.state == PortState::Errored {
            // teardown happens one poll after the failure so callers can
            // observe the errored state
            self.teardown();
        }
        if self.state == PortState::Detached {
            self.begin_probe(now);
        }

        self.run_reader(now);
        self.run_timers(now);
        self.run_writer(now);
    }

    fn begin_probe(&mut self, now: Instant) {
        self.engine = Some(SyncEngine::new());
        self.state = PortState::ProbingBaud;
        self.probing_low = false;
        self.uart.set_baud(BAUD_RATE_HIGH);
        self.enqueue(&Frame::speed(BAUD_RATE_HIGH));
        self.probe.set(now, self.config.probe_window_ms);
    }

    fn run_reader(&mut self, now: Instant) {
        loop {
            match decode(&self.rx_buf[..self.rx_have]) {
                Ok(Decoded::Frame(frame)) => {
                    self.rx_have = 0;
                    self.rx_timer.cancel();
                    self.on_frame(&frame, now);
                }
                Ok(Decoded::NeedMore(need)) => {
                    let was_empty = self.rx_have == 0;
                    let mut chunk = [0u8; MAX_FRAME];
                    let got = match self.uart.read(&mut chunk[..need]) {
                        Ok(n) => n,
                        Err(_) => {
                            self.fail();
                            return;
                        }
                    };
                    if got == 0 {
                        return;
                    }
                    self.rx_buf[self.rx_have..self.rx_have + got].copy_from_slice(&chunk[..got]);
                    self.rx_have += got;
                    if was_empty {
                        // the rest of the frame must arrive promptly
                        self.rx_timer.set(now, self.config.frame_timeout_ms);
                    }
                }
                Err(_) => {
                    // bad byte: drop the buffer, resync on the next header
                    self.rx_have = 0;
                    self.rx_timer.cancel();
                }
            }
        }
    }

    fn run_timers(&mut self, now: Instant) {
        match self.state {
            PortState::ProbingBaud => {
                if self.probe.is_expired(now) {
                    self.toggle_probe(now);
                }
            }
            PortState::Ingesting => {
                // device went quiet mid-sweep
                if self.probe.is_expired(now) {
                    self.fail();
                }
            }
            _ => {}
        }

        if self.rx_timer.is_expired(now) {
            // torn frame: treat like a timed-out read
            self.fail();
        }
        if self.uart.write_busy() && self.tx_timer.is_expired(now) {
            self.fail();
        }

        if self.state.is_supervised() {
            match self.supervisor.poll(now) {
                Some(SupervisorEvent::Stalled) => self.fail(),
                Some(SupervisorEvent::NackDue) => self.nack_due = true,
                None => {}
            }
        }
    }

    fn run_writer(&mut self, now: Instant) {
        if self.uart.write_busy() {
            if !self.tx_timer.is_armed() {
                // a transfer left draining across a teardown still gets
                // a deadline
                self.tx_timer.set(now, self.config.write_timeout_ms);
            }
            return;
        }
        self.tx_timer.cancel();
        if self.state == PortState::Errored {
            return;
        }

        if self.state == PortState::AwaitingAck && self.tx_queue.is_empty() {
            self.finish_handshake(now);
        }

        // command frames first; the keep-alive can always wait a tick
        let bytes = if let Some(bytes) = self.tx_queue.pop_front() {
            bytes
        } else if self.nack_due && self.state.is_supervised() {
            self.nack_due = false;
            let mut buf = TxBytes::new();
            let _ = buf.push(crate::proto::msg::sys::NACK);
            buf
        } else {
            return;
        };

        if self.uart.write(&bytes).is_err() {
            self.fail();
            return;
        }
        self.tx_timer.set(now, self.config.write_timeout_ms);
    }

    fn toggle_probe(&mut self, now: Instant) {
        if self.probing_low {
            // nothing at the bootstrap rate either; ask again fast
            self.probing_low = false;
            self.uart.set_baud(BAUD_RATE_HIGH);
            self.enqueue(&Frame::speed(BAUD_RATE_HIGH));
        } else {
            // no answer to the SPEED request; listen at the bootstrap rate
            self.probing_low = true;
            self.uart.set_baud(BAUD_RATE_LOW);
        }
        self.rx_have = 0;
        self.rx_timer.cancel();
        self.probe.set(now, self.config.probe_window_ms);
    }

    /// The sweep is acknowledged and the ACK has drained: renegotiate
    /// baud and select the initial mode.
    fn finish_handshake(&mut self, now: Instant) {
        let Some(dev) = &self.dev else {
            self.fail();
            return;
        };
        let default_mode = dev.default_mode;

        self.uart.flush();
        self.uart.set_baud(self.target_baud);

        self.current_mode = default_mode;
        self.requested_mode = Some(default_mode);
        let _ = self.request_mode(default_mode);
        self.state = PortState::SettingDefaultMode;
        self.supervisor.start(now);
    }

    // =========================================================================
    // Frame dispatch
    // =========================================================================

    fn on_frame(&mut self, frame: &Frame, now: Instant) {
        match self.state {
            PortState::Detached | PortState::Errored | PortState::AwaitingAck => {}
            PortState::ProbingBaud => {
                if frame.is_ack() {
                    // SPEED accepted; the description follows at this rate
                    self.probe.set(now, self.config.probe_window_ms);
                } else {
                    self.ingest_frame(frame, now);
                }
            }
            PortState::Ingesting => self.ingest_frame(frame, now),
            PortState::SettingDefaultMode | PortState::Ready | PortState::ModeSwitching => {
                self.stream_frame(frame, now);
            }
        }
    }

    fn ingest_frame(&mut self, frame: &Frame, now: Instant) {
        let Some(engine) = self.engine.as_mut() else {
            self.fail();
            return;
        };
        match engine.ingest(frame) {
            Ok(IngestEvent::Continue) => {
                if self.state == PortState::ProbingBaud && engine.type_id().is_some() {
                    self.state = PortState::Ingesting;
                }
                // the sweep is alive; push the silence deadline out
                self.probe.set(now, self.config.probe_window_ms);
            }
            Ok(IngestEvent::SweepComplete) => {
                let Some(engine) = self.engine.take() else {
                    return;
                };
                self.target_baud = engine.target_baud();
                match engine.finalize() {
                    Ok(dev) => {
                        self.dev = Some(dev);
                        self.probe.cancel();
                        self.state = PortState::AwaitingAck;
                        self.enqueue(&Frame::ack());
                    }
                    // missing descriptors: the whole handshake is void
                    Err(_) => self.fail(),
                }
            }
            // malformed frame: drop it, stay in the sweep
            Err(_) => {}
        }
    }

    fn stream_frame(&mut self, frame: &Frame, now: Instant) {
        match frame.kind {
            FrameKind::Data => {
                self.supervisor.on_data(now);
                let mode = frame.mode | self.ext_mode;
                match self.state {
                    PortState::SettingDefaultMode | PortState::ModeSwitching => {
                        if self.requested_mode == Some(mode) {
                            self.requested_mode = None;
                            self.current_mode = mode;
                            self.store_sample(mode, frame, now);
                            self.state = PortState::Ready;
                        }
                        // data for any other mode is stale; the watchdog
                        // was fed, nothing else to do
                    }
                    PortState::Ready => self.store_sample(mode, frame, now),
                    _ => {}
                }
            }
            FrameKind::Cmd if frame.op == cmd::EXT_MODE => {
                self.ext_mode = frame.payload.first().copied().unwrap_or(0) & 0x08;
            }
            // stray SYS/CMD/INFO traffic while streaming carries nothing
            _ => {}
        }
    }

    fn store_sample(&mut self, mode: u8, frame: &Frame, now: Instant) {
        let declared = self
            .dev
            .as_ref()
            .and_then(|dev| dev.mode(mode))
            .map_or(0, ModeDescriptor::sample_len);
        let len = if declared == 0 {
            frame.payload.len()
        } else {
            declared.min(frame.payload.len())
        };

        let mut bytes = [0u8; MAX_PAYLOAD];
        bytes[..frame.payload.len()].copy_from_slice(&frame.payload);
        self.sample = Some(SampleBuf {
            mode,
            len,
            bytes,
            timestamp: now,
        });
        self.sample_seq = self.sample_seq.wrapping_add(1);
    }

    /// Number of samples received since construction. Wrapping; compare
    /// two readings to detect fresh data.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.sample_seq
    }

    // =========================================================================
    // Failure and teardown
    // =========================================================================

    fn fail(&mut self) {
        self.state = PortState::Errored;
    }

    fn teardown(&mut self) {
        self.uart.flush();
        self.uart.set_baud(BAUD_RATE_HIGH);
        while self.tx_queue.pop_front().is_some() {}
        self.nack_due = false;
        self.rx_have = 0;
        self.rx_timer.cancel();
        self.tx_timer.cancel();
        self.probe.cancel();
        self.supervisor.stop();
        self.engine = None;
        self.dev = None;
        self.sample = None;
        self.current_mode = 0;
        self.requested_mode = None;
        self.ext_mode = 0;
        self.target_baud = BAUD_RATE_HIGH;
        self.state = PortState::Detached;
    }

    fn enqueue(&mut self, frame: &Frame) -> bool {
        let mut raw = [0u8; MAX_FRAME];
        let Ok(len) = encode(frame, &mut raw) else {
            return false;
        };
        let mut bytes = TxBytes::new();
        let _ = bytes.extend_from_slice(&raw[..len]);
        self.tx_queue.push_back(bytes).is_ok()
    }

    /// Queue the frames that move the device to `mode`. Modes past 7 do
    /// not fit the 3-bit SELECT/DATA field and need an EXT_MODE prefix.
    fn request_mode(&mut self, mode: u8) -> bool {
        if mode >= 8 && !self.enqueue(&Frame::ext_mode(8)) {
            return false;
        }
        self.enqueue(&Frame::select(mode))
    }

    // =========================================================================
    // Facade operations
    // =========================================================================

    fn check_open(&self) -> core::result::Result<(), nb::Error<Error>> {
        if self.enabled {
            Ok(())
        } else {
            Err(nb::Error::Other(Error::Device(DeviceError::NoDevice)))
        }
    }

    fn synced_device(&self) -> core::result::Result<&DeviceDescriptor, nb::Error<Error>> {
        self.check_open()?;
        match self.state {
            PortState::Ready | PortState::ModeSwitching => {
                self.dev.as_ref().ok_or(nb::Error::WouldBlock)
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }

    /// Whether the port is streaming data in the requested mode.
    ///
    /// # Errors
    ///
    /// `WouldBlock` while detached, syncing, or mode-switching;
    /// [`DeviceError::NoDevice`] when the port is closed.
    pub fn is_ready(&self) -> nb::Result<(), Error> {
        self.check_open()?;
        if self.state == PortState::Ready {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Type id of the attached device.
    ///
    /// # Errors
    ///
    /// `WouldBlock` until synced; [`DeviceError::NoDevice`] when closed.
    pub fn type_id(&self) -> nb::Result<u16, Error> {
        Ok(self.synced_device()?.type_id)
    }

    /// Check the attached device against an expected type id.
    /// [`type_id::ANY_LUMP_UART`] matches every LUMP device. Returns the
    /// actual type id on success.
    ///
    /// # Errors
    ///
    /// [`DeviceError::WrongType`] on mismatch; `WouldBlock` until synced
    /// (a resync in progress reads as pending, never as a stale match).
    pub fn assert_type_id(&self, expected: u16) -> nb::Result<u16, Error> {
        let actual = self.synced_device()?.type_id;
        if expected == type_id::ANY_LUMP_UART || expected == actual {
            Ok(actual)
        } else {
            Err(nb::Error::Other(Error::Device(DeviceError::WrongType)))
        }
    }

    /// Mode count, active mode, and the frozen mode descriptors.
    ///
    /// # Errors
    ///
    /// `WouldBlock` until synced; [`DeviceError::NoDevice`] when closed.
    pub fn info(&self) -> nb::Result<PortInfo<'_>, Error> {
        let dev = self.synced_device()?;
        Ok(PortInfo {
            num_modes: dev.num_modes(),
            current_mode: self.current_mode,
            modes: dev.modes(),
        })
    }

    /// The most recent sample.
    ///
    /// With `mode_filter`, only a sample from that exact mode is
    /// returned; the filter does not have to match the active mode
    /// (useful right after a switch).
    ///
    /// # Errors
    ///
    /// `WouldBlock` until a matching sample exists while ready;
    /// [`DeviceError::InvalidMode`] for a filter out of range.
    pub fn sample(&self, mode_filter: Option<u8>) -> nb::Result<Sample<'_>, Error> {
        let dev = self.synced_device()?;
        if let Some(filter) = mode_filter {
            if filter >= dev.num_modes() {
                return Err(nb::Error::Other(Error::Device(DeviceError::InvalidMode)));
            }
        }
        if self.state != PortState::Ready {
            return Err(nb::Error::WouldBlock);
        }
        let Some(sample) = &self.sample else {
            return Err(nb::Error::WouldBlock);
        };
        if mode_filter.is_some_and(|filter| filter != sample.mode) {
            return Err(nb::Error::WouldBlock);
        }

        let mode = dev.mode(sample.mode).ok_or(nb::Error::WouldBlock)?;
        Ok(Sample {
            mode: sample.mode,
            timestamp: sample.timestamp,
            bytes: &sample.bytes[..sample.len],
            data_type: mode.data_type,
            num_values: mode.num_values,
        })
    }

    /// Request a different active mode.
    ///
    /// Returns `Ok` once the request is queued; completion is observed
    /// through [`is_ready`](Self::is_ready), which stays pending until a
    /// DATA frame for the new mode arrives. Re-requesting the pending
    /// mode is a no-op; requesting a different mode supersedes.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidMode`] for an out-of-range index (state is
    /// untouched); `WouldBlock` while the port is not ready to accept a
    /// request.
    pub fn set_mode(&mut self, mode: u8) -> nb::Result<(), Error> {
        let dev = self.synced_device()?;
        if mode >= dev.num_modes() {
            return Err(nb::Error::Other(Error::Device(DeviceError::InvalidMode)));
        }

        match self.state {
            PortState::Ready => {
                if mode == self.current_mode {
                    return Ok(());
                }
                if !self.request_mode(mode) {
                    return Err(nb::Error::WouldBlock);
                }
                self.requested_mode = Some(mode);
                self.state = PortState::ModeSwitching;
                Ok(())
            }
            PortState::ModeSwitching => {
                if self.requested_mode == Some(mode) {
                    // identical request, already in flight
                    return Ok(());
                }
                if !self.request_mode(mode) {
                    return Err(nb::Error::WouldBlock);
                }
                self.requested_mode = Some(mode);
                Ok(())
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }

    /// Select a writable mode and write one value set to the device
    /// (lights, IR transmitters, motor power modes).
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidMode`] / [`DeviceError::NotWritable`] /
    /// [`DeviceError::InvalidData`] for bad arguments (state untouched);
    /// `WouldBlock` unless the port is ready.
    pub fn write_mode_data(&mut self, mode: u8, data: &[u8]) -> nb::Result<(), Error> {
        let dev = self.synced_device()?;
        let Some(descriptor) = dev.mode(mode) else {
            return Err(nb::Error::Other(Error::Device(DeviceError::InvalidMode)));
        };
        if !descriptor.writable() {
            return Err(nb::Error::Other(Error::Device(DeviceError::NotWritable)));
        }
        if data.len() != descriptor.sample_len() {
            return Err(nb::Error::Other(Error::Device(DeviceError::InvalidData)));
        }
        if self.state != PortState::Ready {
            return Err(nb::Error::WouldBlock);
        }

        let Ok(frame) = Frame::data(mode, data) else {
            return Err(nb::Error::Other(Error::Device(DeviceError::InvalidData)));
        };
        if !self.request_mode(mode) || !self.enqueue(&frame) {
            return Err(nb::Error::WouldBlock);
        }
        self.requested_mode = Some(mode);
        self.state = PortState::ModeSwitching;
        Ok(())
    }

    /// Drive the port until it is ready, sleeping one millisecond per
    /// iteration. Convenience for blocking bring-up code.
    ///
    /// # Errors
    ///
    /// [`IoError::Timeout`] when `timeout_ms` elapses first, or any
    /// terminal facade error.
    pub fn wait_ready<C: Clock, D: DelayNs>(
        &mut self,
        clock: &C,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<()> {
        let start = clock.now();
        loop {
            self.poll(clock.now());
            match self.is_ready() {
                Ok(()) => return Ok(()),
                Err(nb::Error::Other(err)) => return Err(err),
                Err(nb::Error::WouldBlock) => {}
            }
            if clock.now().since(start) >= timeout_ms {
                return Err(Error::Io(IoError::Timeout));
            }
            delay.delay_ms(1);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
