//! Link configuration parameters
//!
//! All tunables for the serial command link. Defaults match the timing the
//! stock peripheral firmware expects.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Serial link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    // --- Transport ---
    /// UART baud rate applied by `start`
    pub baud_rate: u32,

    // --- Start gate ---
    /// How many times an operation checks for a started channel
    pub start_poll_attempts: u16,
    /// Pause between start checks (milliseconds)
    pub start_poll_interval_ms: u32,

    // --- Locking ---
    /// Longest wait for the channel lock (milliseconds)
    pub lock_timeout_ms: u32,
    /// Pause between lock attempts (milliseconds)
    pub lock_poll_interval_ms: u32,

    // --- Sensor reads ---
    /// Deadline for the one-byte sensor response (milliseconds)
    pub sensor_read_timeout_ms: u32,
    /// Pause between empty transport reads (milliseconds)
    pub read_poll_interval_ms: u32,
    /// Settling pause after a sensor read; 0 disables it (milliseconds)
    pub post_read_pause_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            // Transport
            baud_rate: 115_200,

            // Start gate: 25 x 10 ms
            start_poll_attempts: 25,
            start_poll_interval_ms: 10,

            // Locking
            lock_timeout_ms: 250,
            lock_poll_interval_ms: 1,

            // Sensor reads
            sensor_read_timeout_ms: 100,
            read_poll_interval_ms: 1,
            post_read_pause_ms: 1,
        }
    }
}

impl LinkConfig {
    /// Reject values that would make the link unusable.
    pub fn validate(&self) -> Result<()> {
        if !(1_200..=2_000_000).contains(&self.baud_rate) {
            return Err(Error::Config("baud_rate must be 1200–2000000"));
        }
        if self.start_poll_interval_ms == 0 && self.start_poll_attempts > 0 {
            return Err(Error::Config("start_poll_interval_ms must be > 0"));
        }
        if self.lock_poll_interval_ms == 0 {
            return Err(Error::Config("lock_poll_interval_ms must be > 0"));
        }
        if self.lock_poll_interval_ms > self.lock_timeout_ms {
            return Err(Error::Config(
                "lock_poll_interval_ms must not exceed lock_timeout_ms",
            ));
        }
        if self.sensor_read_timeout_ms == 0 {
            return Err(Error::Config("sensor_read_timeout_ms must be > 0"));
        }
        if self.read_poll_interval_ms == 0 {
            return Err(Error::Config("read_poll_interval_ms must be > 0"));
        }
        Ok(())
    }

    pub fn start_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.start_poll_interval_ms))
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.lock_timeout_ms))
    }

    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.lock_poll_interval_ms))
    }

    pub fn sensor_read_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.sensor_read_timeout_ms))
    }

    pub fn read_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.read_poll_interval_ms))
    }

    pub fn post_read_pause(&self) -> Duration {
        Duration::from_millis(u64::from(self.post_read_pause_ms))
    }

    // --- Persistence ---

    /// Compact postcard blob for storing a tuned configuration.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("config encoding failed"))
    }

    /// Decode a stored blob. The result is validated before it is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("stored config is corrupted"))?;
        config.validate()?;
        Ok(config)
    }
}
