//! Hummingbird serial wire protocol.
//!
//! ```text
//!  Handshake   [ 'X' ]
//!  LED         [ 'L', port+0x2F, intensity ]
//!  Tri-LED     [ 'O', port+0x2F, red, green, blue ]
//!  Servo       [ 'S', port+0x2F, angle ]
//!  Motor       [ 'M', port+0x2F, '0'|'1', magnitude ]
//!  Vibration   [ 'V', port+0x2F, intensity ]
//!  Sensor      [ 't', port+0x2F ]  ──▶  peer replies [ raw ]
//! ```
//!
//! All frames are fixed length. Controller-side encoding lives in
//! [`frame`], peripheral-side decoding in [`codec`].

pub mod codec;
pub mod frame;
pub mod port;
pub mod scaling;
