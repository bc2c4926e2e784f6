//! Simulated peripheral board.
//!
//! Implements [`Transport`] by playing the Hummingbird end of the link in
//! memory: every byte written is decoded with [`FrameDecoder`] and applied
//! to a [`BoardState`], and sensor queries are answered from settable raw
//! values. Handles are cheap clones sharing one board, so a test can keep
//! one while the channel owns another.
//!
//! Reads never block; an empty response queue returns 0 and the channel
//! falls back to its clock for pacing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use core::time::Duration;

use log::debug;

use crate::app::ports::Transport;
use crate::protocol::codec::{DecodedFrame, FrameDecoder};
use crate::protocol::port::{FourPort, Port, PortClass};
use crate::protocol::scaling::Direction;

/// Faults the simulated board can be told to exhibit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimFaults {
    /// Every write returns an error.
    pub fail_writes: bool,
    /// Every read returns an error.
    pub fail_reads: bool,
    /// Sensor queries are decoded but never answered.
    pub mute_responses: bool,
    /// Accept at most this many bytes per write call.
    pub max_write_chunk: Option<usize>,
    /// Yield the thread after every write call.
    pub yield_after_write: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    WriteRejected,
    ReadRejected,
    BadBaud,
}

/// Actuator outputs as the peripheral board last set them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub handshakes: u32,
    pub leds: [u8; 4],
    pub tri_leds: [(u8, u8, u8); 2],
    pub servos: [u8; 4],
    pub motors: [(Direction, u8); 2],
    pub vibration: [u8; 2],
    pub sensor_queries: u32,
    /// Frames with a port the board does not have, or a bad direction byte.
    pub rejected: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            handshakes: 0,
            leds: [0; 4],
            tri_leds: [(0, 0, 0); 2],
            servos: [0; 4],
            motors: [(Direction::Forward, 0); 2],
            vibration: [0; 2],
            sensor_queries: 0,
            rejected: 0,
        }
    }
}

struct SimState {
    decoder: FrameDecoder,
    board: BoardState,
    sensors: [u8; 4],
    wire: Vec<u8>,
    frames: Vec<DecodedFrame>,
    pending: VecDeque<u8>,
    baud: Option<u32>,
    faults: SimFaults,
}

impl SimState {
    fn apply(&mut self, frame: DecodedFrame) {
        self.frames.push(frame);
        let ok = match frame {
            DecodedFrame::Handshake => {
                self.board.handshakes += 1;
                true
            }
            DecodedFrame::Led { port, intensity } => {
                store(&mut self.board.leds, PortClass::Four, port, intensity)
            }
            DecodedFrame::TriLed {
                port,
                red,
                green,
                blue,
            } => store(
                &mut self.board.tri_leds,
                PortClass::Two,
                port,
                (red, green, blue),
            ),
            DecodedFrame::Servo { port, angle } => {
                store(&mut self.board.servos, PortClass::Four, port, angle)
            }
            DecodedFrame::Motor {
                port,
                direction: Some(dir),
                magnitude,
            } => store(&mut self.board.motors, PortClass::Two, port, (dir, magnitude)),
            DecodedFrame::Motor { direction: None, .. } => false,
            DecodedFrame::Vibration { port, intensity } => {
                store(&mut self.board.vibration, PortClass::Two, port, intensity)
            }
            DecodedFrame::SensorQuery { port } => {
                self.board.sensor_queries += 1;
                match slot(&mut self.sensors, PortClass::Four, port) {
                    Some(raw) => {
                        if !self.faults.mute_responses {
                            self.pending.push_back(*raw);
                        }
                        true
                    }
                    None => false,
                }
            }
        };
        if !ok {
            debug!("sim: rejected {:?}", frame);
            self.board.rejected += 1;
        }
    }
}

fn store<T>(outputs: &mut [T], class: PortClass, port: u8, value: T) -> bool {
    match slot(outputs, class, port) {
        Some(s) => {
            *s = value;
            true
        }
        None => false,
    }
}

fn slot<T>(outputs: &mut [T], class: PortClass, port: u8) -> Option<&mut T> {
    if class.contains(port) {
        outputs.get_mut(usize::from(port) - 1)
    } else {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// SimPeripheral
// ───────────────────────────────────────────────────────────────

/// In-memory peripheral board; clone to keep an inspection handle.
#[derive(Clone)]
pub struct SimPeripheral {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimPeripheral {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPeripheral {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                decoder: FrameDecoder::new(),
                board: BoardState::default(),
                sensors: [0; 4],
                wire: Vec::new(),
                frames: Vec::new(),
                pending: VecDeque::new(),
                baud: None,
                faults: SimFaults::default(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Stimulus ──────────────────────────────────────────────

    /// Raw 0–255 value the board reports for a sensor port.
    pub fn set_sensor(&self, port: FourPort, raw: u8) {
        self.state().sensors[usize::from(port.number()) - 1] = raw;
    }

    pub fn set_faults(&self, faults: SimFaults) {
        self.state().faults = faults;
    }

    /// Queue bytes as if the board had sent them unprompted.
    pub fn inject_response(&self, bytes: &[u8]) {
        self.state().pending.extend(bytes.iter().copied());
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn board(&self) -> BoardState {
        self.state().board.clone()
    }

    /// Every byte the controller has written, in order.
    pub fn wire_log(&self) -> Vec<u8> {
        self.state().wire.clone()
    }

    /// Every frame decoded so far, in order.
    pub fn frames(&self) -> Vec<DecodedFrame> {
        self.state().frames.clone()
    }

    /// Last baud rate the controller applied.
    pub fn baud(&self) -> Option<u32> {
        self.state().baud
    }

    /// Bytes the decoder dropped while hunting for a tag.
    pub fn discarded(&self) -> usize {
        self.state().decoder.discarded()
    }

    pub fn pending_responses(&self) -> usize {
        self.state().pending.len()
    }
}

impl Transport for SimPeripheral {
    type Error = SimError;

    fn write(&mut self, data: &[u8]) -> Result<usize, SimError> {
        let (n, yield_after) = {
            let mut st = self.state();
            if st.faults.fail_writes {
                return Err(SimError::WriteRejected);
            }
            let n = st
                .faults
                .max_write_chunk
                .map_or(data.len(), |max| data.len().min(max));
            let accepted = &data[..n];
            st.wire.extend_from_slice(accepted);

            let mut decoded = Vec::new();
            st.decoder.feed(accepted, |f| decoded.push(f));
            for frame in decoded {
                st.apply(frame);
            }
            (n, st.faults.yield_after_write)
        };
        if yield_after {
            std::thread::yield_now();
        }
        Ok(n)
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize, SimError> {
        let mut st = self.state();
        if st.faults.fail_reads {
            return Err(SimError::ReadRejected);
        }
        let mut n = 0;
        while n < buf.len() {
            match st.pending.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), SimError> {
        Ok(())
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), SimError> {
        if baud == 0 {
            return Err(SimError::BadBaud);
        }
        let mut st = self.state();
        st.baud = Some(baud);
        st.decoder.reset();
        Ok(())
    }
}
