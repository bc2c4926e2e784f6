//! Command channel: exclusive, deadline-bounded access to the serial link.
//!
//! [`CommandChannel`] owns the transport behind an embassy-sync mutex and
//! a `started` flag set by the handshake. Every operation follows the same
//! shape:
//!
//! ```text
//!  wait_started ──▶ encode ──▶ acquire (timeout) ──▶ write [──▶ read] ──▶ drop guard
//! ```
//!
//! Nothing here spins without bound: the start gate, lock acquisition and
//! response read all give up at a deadline measured on the [`Clock`] port.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use log::{debug, info, warn};

use crate::config::LinkConfig;
use crate::diagnostics::{LinkStats, StatsSnapshot};
use crate::error::{ChannelError, Error, Result, TransportError};
use crate::protocol::frame::{Command, Tag};
use crate::protocol::port::FourPort;

use super::ports::{Clock, Transport};

/// Upper bound on stale bytes discarded before a query.
const MAX_DRAIN_BYTES: usize = 64;

// ───────────────────────────────────────────────────────────────
// CommandChannel
// ───────────────────────────────────────────────────────────────

/// The single owner of the serial link to the peripheral board.
pub struct CommandChannel<T, C> {
    link: Mutex<CriticalSectionRawMutex, T>,
    started: AtomicBool,
    clock: C,
    config: LinkConfig,
    stats: LinkStats,
}

impl<T: Transport, C: Clock> CommandChannel<T, C> {
    /// Wrap a transport. Does **not** start the link; call [`start`](Self::start).
    pub fn new(transport: T, clock: C, config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            link: Mutex::new(transport),
            started: AtomicBool::new(false),
            clock,
            config,
            stats: LinkStats::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Set the line rate, send the `'X'` handshake and open the start gate.
    ///
    /// Safe to repeat: each call sends another handshake.
    pub fn start(&self) -> Result<()> {
        let result = self.start_inner();
        self.track(result)
    }

    fn start_inner(&self) -> Result<()> {
        let mut link = self.acquire()?;
        link.set_baud_rate(self.config.baud_rate)?;
        link.write_frame(&Command::Handshake.encode())?;
        self.started.store(true, Ordering::Release);
        self.stats.record_handshake();
        info!("link started at {} baud", self.config.baud_rate);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    // ── Operations ────────────────────────────────────────────

    /// Encode and transmit one actuator command.
    pub fn send(&self, command: &Command) -> Result<()> {
        let result = self.send_inner(command);
        self.track(result)
    }

    fn send_inner(&self, command: &Command) -> Result<()> {
        self.wait_started()?;
        let frame = command.encode();
        let mut link = self.acquire()?;
        link.write_frame(&frame)?;
        self.stats.record_frame(frame.len());
        Ok(())
    }

    /// Query a sensor port and return the raw response byte.
    ///
    /// The query write and the response read share one critical section,
    /// so no other frame can land between them.
    pub fn query_sensor(&self, port: FourPort, timeout: Duration) -> Result<u8> {
        let result = self.query_inner(port, timeout);
        self.track(result)
    }

    fn query_inner(&self, port: FourPort, timeout: Duration) -> Result<u8> {
        self.wait_started()?;
        let frame = Command::SensorQuery { port }.encode();
        let raw = {
            let mut link = self.acquire()?;
            link.drain_input();
            link.write_frame(&frame)?;
            self.stats.record_frame(frame.len());
            let mut resp = [0u8; Tag::SensorQuery.response_len()];
            link.read_exact(&mut resp, timeout)?;
            resp[0]
        };
        self.stats.record_sensor_read();

        let settle = self.config.post_read_pause();
        if !settle.is_zero() {
            self.clock.pause(settle);
        }
        Ok(raw)
    }

    // ── Locking ───────────────────────────────────────────────

    /// Take exclusive use of the transport, giving up after the lock timeout.
    ///
    /// The lock is released when the returned guard drops.
    pub fn acquire(&self) -> Result<LinkGuard<'_, T, C>> {
        let deadline = deadline_after(&self.clock, self.config.lock_timeout());
        loop {
            if let Ok(inner) = self.link.try_lock() {
                return Ok(LinkGuard {
                    inner,
                    clock: &self.clock,
                    poll: self.config.read_poll_interval(),
                });
            }
            if self.clock.now() >= deadline {
                warn!(
                    "channel busy for {} ms, giving up",
                    self.config.lock_timeout_ms
                );
                return Err(ChannelError::BusyTimeout.into());
            }
            self.clock.pause(self.config.lock_poll_interval());
        }
    }

    /// Run the start gate on its own, counting a failure like any operation.
    ///
    /// Lets callers order the gate ahead of their own argument checks.
    pub fn ensure_started(&self) -> Result<()> {
        let result = self.wait_started();
        self.track(result)
    }

    /// Poll the started flag a bounded number of times.
    fn wait_started(&self) -> Result<()> {
        for _ in 0..self.config.start_poll_attempts {
            if self.is_started() {
                return Ok(());
            }
            self.clock.pause(self.config.start_poll_interval());
        }
        if self.is_started() {
            return Ok(());
        }
        warn!("link not started; was start() called?");
        Err(ChannelError::NotInitialized.into())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn track<R>(&self, result: Result<R>) -> Result<R> {
        if let Err(e) = &result {
            self.stats.record_error(*e);
        }
        result
    }
}

/// `timeout` from now, saturating so an unbounded wait cannot overflow.
fn deadline_after<C: Clock>(clock: &C, timeout: Duration) -> Duration {
    clock.now().checked_add(timeout).unwrap_or(Duration::MAX)
}

// ───────────────────────────────────────────────────────────────
// LinkGuard
// ───────────────────────────────────────────────────────────────

/// Scoped exclusive access to the transport.
pub struct LinkGuard<'a, T, C> {
    inner: MutexGuard<'a, CriticalSectionRawMutex, T>,
    clock: &'a C,
    poll: Duration,
}

impl<T: Transport, C: Clock> LinkGuard<'_, T, C> {
    /// Write the whole frame, then flush.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < frame.len() {
            match self.inner.write(&frame[written..]) {
                Ok(0) => {
                    warn!("transport stalled after {written}/{} bytes", frame.len());
                    return Err(TransportError::WriteFailed.into());
                }
                Ok(n) => written += n,
                Err(e) => {
                    warn!("transport write failed: {:?}", e);
                    return Err(TransportError::WriteFailed.into());
                }
            }
        }
        self.inner.flush().map_err(|e| {
            warn!("transport flush failed: {:?}", e);
            Error::from(TransportError::WriteFailed)
        })?;
        debug!("TX {:02X?}", frame);
        Ok(())
    }

    /// Fill `buf` completely or fail at `timeout`.
    pub fn read_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        let deadline = deadline_after(self.clock, timeout);
        let mut filled = 0;
        while filled < buf.len() {
            let remaining = deadline.saturating_sub(self.clock.now());
            match self.inner.read(&mut buf[filled..], remaining) {
                Ok(0) => {
                    if remaining.is_zero() {
                        warn!("no response within {:?}", timeout);
                        return Err(TransportError::ReadTimeout.into());
                    }
                    self.clock.pause(self.poll.min(remaining));
                }
                Ok(n) => filled += n,
                Err(e) => {
                    warn!("transport read failed: {:?}", e);
                    return Err(TransportError::ReadFailed.into());
                }
            }
        }
        debug!("RX {:02X?}", buf);
        Ok(())
    }

    pub fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        self.inner.set_baud_rate(baud).map_err(|e| {
            warn!("baud change to {baud} failed: {:?}", e);
            Error::from(TransportError::ConfigureFailed)
        })
    }

    /// Discard bytes already waiting, e.g. a late reply to a timed-out query.
    pub fn drain_input(&mut self) -> usize {
        let mut scratch = [0u8; 8];
        let mut dropped = 0;
        while dropped < MAX_DRAIN_BYTES {
            match self.inner.read(&mut scratch, Duration::ZERO) {
                Ok(0) | Err(_) => break,
                Ok(n) => dropped += n,
            }
        }
        if dropped > 0 {
            debug!("drained {dropped} stale byte(s)");
        }
        dropped
    }
}
