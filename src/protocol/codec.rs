//! Peripheral-side streaming frame decoder.
//!
//! The link has no framing beyond fixed per-tag lengths, so the decoder
//! looks at the first byte to learn how many more to collect. A byte that
//! is not a known tag while waiting for a frame start is discarded, which
//! lets the decoder resynchronise after line noise.
//!
//! Bytes may arrive one at a time, split across reads, or several frames
//! per read; [`FrameDecoder::push`] handles one byte and yields a frame
//! whenever one completes.

use super::frame::{MAX_FRAME_LEN, Tag};
use super::port::PORT_CODE_OFFSET;
use super::scaling::Direction;

/// A frame as the peripheral board sees it: raw wire values.
///
/// `port` is the connector number recovered from the port code; it is not
/// range-checked, since the peripheral has to cope with whatever arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedFrame {
    Handshake,
    Led { port: u8, intensity: u8 },
    TriLed { port: u8, red: u8, green: u8, blue: u8 },
    Servo { port: u8, angle: u8 },
    /// `direction` is `None` when the byte is neither `'0'` nor `'1'`.
    Motor {
        port: u8,
        direction: Option<Direction>,
        magnitude: u8,
    },
    Vibration { port: u8, intensity: u8 },
    SensorQuery { port: u8 },
}

/// Decoder state machine.
enum DecoderState {
    /// Waiting for a tag byte.
    AwaitingTag,
    /// Tag received, collecting the rest of the frame.
    Collecting { tag: Tag, collected: usize },
}

/// Streaming frame decoder.
pub struct FrameDecoder {
    state: DecoderState,
    buf: [u8; MAX_FRAME_LEN],
    discarded: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::AwaitingTag,
            buf: [0; MAX_FRAME_LEN],
            discarded: 0,
        }
    }

    /// Feed one byte. Returns a frame when this byte completes one.
    pub fn push(&mut self, byte: u8) -> Option<DecodedFrame> {
        match &mut self.state {
            DecoderState::AwaitingTag => {
                let Some(tag) = Tag::from_byte(byte) else {
                    self.discarded += 1;
                    return None;
                };
                self.buf[0] = byte;
                if tag.frame_len() == 1 {
                    return Some(self.finish(tag));
                }
                self.state = DecoderState::Collecting { tag, collected: 1 };
                None
            }
            DecoderState::Collecting { tag, collected } => {
                self.buf[*collected] = byte;
                *collected += 1;
                if *collected == tag.frame_len() {
                    let tag = *tag;
                    self.state = DecoderState::AwaitingTag;
                    return Some(self.finish(tag));
                }
                None
            }
        }
    }

    /// Feed a slice, calling `on_frame` for each completed frame.
    pub fn feed(&mut self, data: &[u8], mut on_frame: impl FnMut(DecodedFrame)) {
        for &b in data {
            if let Some(frame) = self.push(b) {
                on_frame(frame);
            }
        }
    }

    /// Count of bytes dropped while hunting for a tag.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Whether a frame is partially collected.
    pub fn is_mid_frame(&self) -> bool {
        matches!(self.state, DecoderState::Collecting { .. })
    }

    /// Drop any partial frame (e.g. after a baud change).
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingTag;
    }

    fn finish(&self, tag: Tag) -> DecodedFrame {
        let b = &self.buf;
        let port = b[1].wrapping_sub(PORT_CODE_OFFSET);
        match tag {
            Tag::Handshake => DecodedFrame::Handshake,
            Tag::Led => DecodedFrame::Led {
                port,
                intensity: b[2],
            },
            Tag::TriLed => DecodedFrame::TriLed {
                port,
                red: b[2],
                green: b[3],
                blue: b[4],
            },
            Tag::Servo => DecodedFrame::Servo { port, angle: b[2] },
            Tag::Motor => DecodedFrame::Motor {
                port,
                direction: Direction::from_wire(b[2]),
                magnitude: b[3],
            },
            Tag::Vibration => DecodedFrame::Vibration {
                port,
                intensity: b[2],
            },
            Tag::SensorQuery => DecodedFrame::SensorQuery { port },
        }
    }
}
