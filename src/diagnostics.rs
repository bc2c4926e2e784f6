//! Link runtime counters.
//!
//! Lock-free so they can be bumped from any caller without touching the
//! channel lock. Collected on demand into a serialisable snapshot.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, Error};

#[derive(Debug, Default)]
pub struct LinkStats {
    handshakes: AtomicU32,
    frames_sent: AtomicU32,
    bytes_sent: AtomicU32,
    sensor_reads: AtomicU32,
    start_timeouts: AtomicU32,
    busy_timeouts: AtomicU32,
    transport_errors: AtomicU32,
}

/// Point-in-time copy of [`LinkStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub handshakes: u32,
    pub frames_sent: u32,
    pub bytes_sent: u32,
    pub sensor_reads: u32,
    pub start_timeouts: u32,
    pub busy_timeouts: u32,
    pub transport_errors: u32,
}

impl LinkStats {
    pub const fn new() -> Self {
        Self {
            handshakes: AtomicU32::new(0),
            frames_sent: AtomicU32::new(0),
            bytes_sent: AtomicU32::new(0),
            sensor_reads: AtomicU32::new(0),
            start_timeouts: AtomicU32::new(0),
            busy_timeouts: AtomicU32::new(0),
            transport_errors: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_handshake(&self) {
        self.handshakes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame(&self, len: usize) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(len as u32, Ordering::Relaxed);
    }

    pub(crate) fn record_sensor_read(&self) {
        self.sensor_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Bucket a failure into its counter. Port and config errors are
    /// caller mistakes and are not counted.
    pub(crate) fn record_error(&self, err: Error) {
        let counter = match err {
            Error::Channel(ChannelError::NotInitialized) => &self.start_timeouts,
            Error::Channel(ChannelError::BusyTimeout) => &self.busy_timeouts,
            Error::Transport(_) => &self.transport_errors,
            Error::Port(_) | Error::Config(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            handshakes: self.handshakes.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            sensor_reads: self.sensor_reads.load(Ordering::Relaxed),
            start_timeouts: self.start_timeouts.load(Ordering::Relaxed),
            busy_timeouts: self.busy_timeouts.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }
}
