//! Range mapping between human-facing values and wire bytes.
//!
//! Every input is saturated to its declared range before scaling, so the
//! result always fits in a byte. Scaling truncates; only the
//! sensor-to-percent conversion rounds.

/// Brightness / intensity range, in percent.
pub const PERCENT_MAX: i32 = 100;
/// Servo travel, in degrees.
pub const ANGLE_MAX: i32 = 180;
/// Servo full-scale wire value. The peripheral maps 0–225 onto 0–180°.
pub const SERVO_WIRE_MAX: i32 = 225;
/// Motor speed magnitude limit.
pub const SPEED_MAX: i32 = 100;

/// Motor rotation sense, encoded as an ASCII digit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Forward = b'0',
    Reverse = b'1',
}

impl Direction {
    pub const fn wire(self) -> u8 {
        self as u8
    }

    pub const fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Self::Forward),
            b'1' => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// 0–100 % → 0–255.
pub fn percent_to_byte(percent: i32) -> u8 {
    let p = percent.clamp(0, PERCENT_MAX);
    (p * 255 / PERCENT_MAX) as u8
}

/// 0–180° → 0–225.
pub fn angle_to_byte(degrees: i32) -> u8 {
    let a = degrees.clamp(0, ANGLE_MAX);
    (a * SERVO_WIRE_MAX / ANGLE_MAX) as u8
}

/// -100–100 → direction + 0–255 magnitude. Zero is forward.
pub fn speed_to_motor(speed: i32) -> (Direction, u8) {
    let s = speed.clamp(-SPEED_MAX, SPEED_MAX);
    let dir = if s < 0 {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    (dir, (s.abs() * 255 / SPEED_MAX) as u8)
}

/// Raw sensor byte → 0–100 %, rounded to nearest.
pub fn byte_to_percent(raw: u8) -> u8 {
    // raw*100 is never an exact half multiple of 255, so half-up and
    // half-even agree.
    ((u16::from(raw) * 100 + 127) / 255) as u8
}
