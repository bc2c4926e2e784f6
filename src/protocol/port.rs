//! Peripheral board connector identifiers.
//!
//! LEDs, servos and sensors sit on four connectors; tri-colour LEDs, DC
//! motors and vibration motors on two. Each class is a closed enum so an
//! out-of-range port cannot reach the encoder.

use crate::error::PortError;

/// Added to the port number to form its wire code (ASCII `'0'` - 1).
pub const PORT_CODE_OFFSET: u8 = 0x2F;

/// Which closed set a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortClass {
    /// Ports 1–4.
    Four,
    /// Ports 1–2.
    Two,
}

impl PortClass {
    pub const fn max_port(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Two => 2,
        }
    }

    pub const fn contains(self, number: u8) -> bool {
        number >= 1 && number <= self.max_port()
    }
}

/// Common behaviour of [`FourPort`] and [`TwoPort`].
pub trait Port: Copy + core::fmt::Debug {
    /// Connector number as printed on the board.
    fn number(self) -> u8;

    /// Byte sent on the wire for this port.
    fn wire_code(self) -> u8 {
        self.number() + PORT_CODE_OFFSET
    }
}

/// LED, servo and sensor connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FourPort {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl FourPort {
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];
}

impl Port for FourPort {
    fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for FourPort {
    type Error = PortError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(PortError {
                class: PortClass::Four,
                value,
            }),
        }
    }
}

/// Tri-colour LED, DC motor and vibration motor connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TwoPort {
    One = 1,
    Two = 2,
}

impl TwoPort {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];
}

impl Port for TwoPort {
    fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for TwoPort {
    type Error = PortError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(PortError {
                class: PortClass::Two,
                value,
            }),
        }
    }
}
