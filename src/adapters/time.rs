//! Clock adapters.
//!
//! - [`SystemClock`]: monotonic time and real pauses.
//!   - **`target_os = "espidf"`**: `esp_timer_get_time()` and FreeRTOS
//!     task delays.
//!   - **`not(target_os = "espidf")`**: `std::time::Instant` and
//!     `std::thread::sleep` for host-side runs.
//! - [`ManualClock`]: simulated time that only moves when paused or
//!   advanced, for deterministic tests and simulation.

use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;

use crate::app::ports::Clock;

// ───────────────────────────────────────────────────────────────
// SystemClock
// ───────────────────────────────────────────────────────────────

/// Wall-clock-backed [`Clock`].
pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    /// Time since boot.
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Duration {
        // SAFETY: esp_timer_get_time has no preconditions once the timer
        // service is up, which ESP-IDF guarantees before app_main.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64)
    }

    /// Time since this clock was created.
    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    #[cfg(target_os = "espidf")]
    fn pause(&self, duration: Duration) {
        // Sub-millisecond pauses still yield for one tick.
        let ms = duration.as_millis().clamp(1, u128::from(u32::MAX)) as u32;
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ───────────────────────────────────────────────────────────────
// ManualClock
// ───────────────────────────────────────────────────────────────

/// Simulated time: `pause` advances the clock instead of sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }

    fn pause(&self, duration: Duration) {
        self.advance(duration);
    }
}
