//! Unified error types for the Hummingbird link.
//!
//! A single `Error` enum that every layer converts into, so callers of the
//! public API match on one type. All variants are `Copy`: transport-specific
//! detail is logged where it is converted and never carried further.

use core::fmt;

use crate::protocol::port::PortClass;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation on the link funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The channel was not started, or could not be acquired in time.
    Channel(ChannelError),
    /// A port number is outside its closed set.
    Port(PortError),
    /// The serial transport failed to write or read.
    Transport(TransportError),
    /// The link configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "channel: {e}"),
            Self::Port(e) => write!(f, "port: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// `start` was never called (or did not finish) within the start gate.
    NotInitialized,
    /// Another caller held the channel past the lock timeout.
    BusyTimeout,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "channel not initialized"),
            Self::BusyTimeout => write!(f, "channel busy (lock timeout)"),
        }
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// A raw port number that does not belong to its port class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortError {
    pub class: PortClass,
    pub value: i32,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "port {} out of range for {:?} (1-{})",
            self.value,
            self.class,
            self.class.max_port()
        )
    }
}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Self::Port(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The transport rejected a write or accepted zero bytes.
    WriteFailed,
    /// The transport reported a read error.
    ReadFailed,
    /// No response byte arrived before the read deadline.
    ReadTimeout,
    /// The baud rate could not be applied.
    ConfigureFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::ReadTimeout => write!(f, "read timed out"),
            Self::ConfigureFailed => write!(f, "baud rate change failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
