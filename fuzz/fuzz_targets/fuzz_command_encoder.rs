//! Fuzz target: `Command::encode`
//!
//! Builds commands from arbitrary parameters (far outside their ranges)
//! and checks that each encodes to exactly its tag's length and decodes
//! back into one frame of the same kind.
//!
//! cargo fuzz run fuzz_command_encoder

#![no_main]

use hummingbird::protocol::codec::FrameDecoder;
use hummingbird::protocol::frame::Command;
use hummingbird::{FourPort, TwoPort};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, u8, i32, i32, i32)| {
    let (kind, port, a, b, c) = input;
    let four = FourPort::ALL[usize::from(port % 4)];
    let two = TwoPort::ALL[usize::from(port % 2)];
    let cmd = match kind % 7 {
        0 => Command::Handshake,
        1 => Command::Led { port: four, brightness: a },
        2 => Command::TriLed { port: two, red: a, green: b, blue: c },
        3 => Command::Servo { port: four, angle: a },
        4 => Command::Motor { port: two, speed: a },
        5 => Command::Vibration { port: two, intensity: a },
        _ => Command::SensorQuery { port: four },
    };

    let frame = cmd.encode();
    assert_eq!(frame.len(), cmd.tag().frame_len());

    let mut decoder = FrameDecoder::new();
    let mut decoded = 0;
    decoder.feed(&frame, |_| decoded += 1);
    assert_eq!(decoded, 1);
    assert_eq!(decoder.discarded(), 0);
});
