//! Command frames: tag byte, port code, fixed payload.
//!
//! ```text
//! ┌─────┬───────────┬──────────────────────┐
//! │ tag │ port+0x2F │ payload (0–3 bytes)  │
//! └─────┴───────────┴──────────────────────┘
//! ```
//!
//! The handshake is the only frame without a port byte. Lengths are fixed
//! per tag; there is no length prefix, checksum or terminator.

use heapless::Vec;

use super::port::{FourPort, Port, TwoPort};
use super::scaling::{angle_to_byte, percent_to_byte, speed_to_motor};

/// Longest frame on the wire (tri-colour LED).
pub const MAX_FRAME_LEN: usize = 5;

/// An encoded frame, ready to hand to the transport.
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// First byte of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Handshake = b'X',
    Led = b'L',
    TriLed = b'O',
    Servo = b'S',
    Motor = b'M',
    Vibration = b'V',
    SensorQuery = b't',
}

impl Tag {
    pub const fn byte(self) -> u8 {
        self as u8
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'X' => Some(Self::Handshake),
            b'L' => Some(Self::Led),
            b'O' => Some(Self::TriLed),
            b'S' => Some(Self::Servo),
            b'M' => Some(Self::Motor),
            b'V' => Some(Self::Vibration),
            b't' => Some(Self::SensorQuery),
            _ => None,
        }
    }

    /// Total frame length, tag included.
    pub const fn frame_len(self) -> usize {
        match self {
            Self::Handshake => 1,
            Self::SensorQuery => 2,
            Self::Led | Self::Servo | Self::Vibration => 3,
            Self::Motor => 4,
            Self::TriLed => 5,
        }
    }

    /// Bytes the peripheral sends back after this frame.
    pub const fn response_len(self) -> usize {
        match self {
            Self::SensorQuery => 1,
            _ => 0,
        }
    }
}

/// A request to the peripheral board, with values in human-facing units.
///
/// Values are whole units; fractional inputs are truncated by the caller.
/// Values outside their range are clamped at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Handshake,
    /// Brightness 0–100 %.
    Led { port: FourPort, brightness: i32 },
    /// Per-channel brightness 0–100 %.
    TriLed {
        port: TwoPort,
        red: i32,
        green: i32,
        blue: i32,
    },
    /// Angle 0–180°.
    Servo { port: FourPort, angle: i32 },
    /// Speed -100–100; negative reverses.
    Motor { port: TwoPort, speed: i32 },
    /// Intensity 0–100 %.
    Vibration { port: TwoPort, intensity: i32 },
    SensorQuery { port: FourPort },
}

impl Command {
    pub const fn tag(&self) -> Tag {
        match self {
            Self::Handshake => Tag::Handshake,
            Self::Led { .. } => Tag::Led,
            Self::TriLed { .. } => Tag::TriLed,
            Self::Servo { .. } => Tag::Servo,
            Self::Motor { .. } => Tag::Motor,
            Self::Vibration { .. } => Tag::Vibration,
            Self::SensorQuery { .. } => Tag::SensorQuery,
        }
    }

    /// Clamp, scale and lay out the frame.
    pub fn encode(&self) -> Frame {
        let mut frame = Frame::new();
        let mut push = |b: u8| {
            let pushed = frame.push(b);
            debug_assert!(pushed.is_ok(), "frame longer than MAX_FRAME_LEN");
        };

        push(self.tag().byte());
        match *self {
            Self::Handshake => {}
            Self::Led { port, brightness } => {
                push(port.wire_code());
                push(percent_to_byte(brightness));
            }
            Self::TriLed {
                port,
                red,
                green,
                blue,
            } => {
                push(port.wire_code());
                push(percent_to_byte(red));
                push(percent_to_byte(green));
                push(percent_to_byte(blue));
            }
            Self::Servo { port, angle } => {
                push(port.wire_code());
                push(angle_to_byte(angle));
            }
            Self::Motor { port, speed } => {
                let (dir, magnitude) = speed_to_motor(speed);
                push(port.wire_code());
                push(dir.wire());
                push(magnitude);
            }
            Self::Vibration { port, intensity } => {
                push(port.wire_code());
                push(percent_to_byte(intensity));
            }
            Self::SensorQuery { port } => {
                push(port.wire_code());
            }
        }
        frame
    }
}
