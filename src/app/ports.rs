//! Port traits: the hexagonal boundary between the link and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CommandChannel (domain)
//! ```
//!
//! Driven adapters (UART, simulated peripheral, clocks) implement these
//! traits. The [`CommandChannel`](super::channel::CommandChannel) consumes
//! them via generics, so the protocol core never touches hardware directly.

use core::time::Duration;

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain ↔ serial peripheral)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented, full-duplex serial channel.
///
/// Concrete implementations:
/// - ESP-IDF UART driver
/// - in-memory simulated peripheral board
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write as much of `data` as the transport accepts.
    /// Returns the number of bytes written; 0 means no progress.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout`.
    /// Returns 0 if nothing arrived in time.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;

    /// Block until buffered output has left the transmitter.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Reconfigure the line rate.
    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain → timer / scheduler)
// ───────────────────────────────────────────────────────────────

/// Monotonic time and blocking pauses.
///
/// Takes `&self` so one clock can serve concurrent callers.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Suspend the calling context for `duration`.
    fn pause(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn pause(&self, duration: Duration) {
        (**self).pause(duration);
    }
}
