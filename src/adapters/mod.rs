//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter | Implements | Connects to                      |
//! |---------|------------|----------------------------------|
//! | `sim`   | Transport  | In-memory peripheral board       |
//! | `time`  | Clock      | ESP32 system timer / std::time   |
//! | `uart`  | Transport  | ESP-IDF UART driver (espidf only)|

pub mod sim;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
