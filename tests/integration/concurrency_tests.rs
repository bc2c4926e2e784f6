//! Integration tests: several threads sharing one link.
//!
//! These use the real [`SystemClock`] and a simulated board that accepts
//! one byte per write and yields afterwards, which makes interleaving
//! likely if the channel lock ever failed to cover a whole frame.

use std::thread;
use std::time::Duration;

use hummingbird::Hummingbird;
use hummingbird::adapters::sim::{SimFaults, SimPeripheral};
use hummingbird::adapters::time::SystemClock;
use hummingbird::config::LinkConfig;
use hummingbird::protocol::codec::DecodedFrame;
use hummingbird::protocol::scaling::{
    Direction, angle_to_byte, percent_to_byte, speed_to_motor,
};
use hummingbird::{FourPort, TwoPort};

const OPS_PER_THREAD: i32 = 50;

type RealBird = Hummingbird<SimPeripheral, SystemClock>;

fn contended_link() -> (RealBird, SimPeripheral) {
    let sim = SimPeripheral::new();
    sim.set_faults(SimFaults {
        max_write_chunk: Some(1),
        yield_after_write: true,
        ..SimFaults::default()
    });
    let cfg = LinkConfig {
        lock_timeout_ms: 5_000,
        ..LinkConfig::default()
    };
    let bird = Hummingbird::new(sim.clone(), SystemClock::new(), cfg).unwrap();
    (bird, sim)
}

#[test]
fn frames_from_parallel_callers_never_interleave() {
    let (bird, sim) = contended_link();
    bird.start().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..OPS_PER_THREAD {
                bird.set_led(FourPort::One, i).unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..OPS_PER_THREAD {
                bird.set_servo(FourPort::Two, i * 3).unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..OPS_PER_THREAD {
                bird.set_motor(TwoPort::One, i - 25).unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..OPS_PER_THREAD {
                bird.set_vibration_motor(TwoPort::Two, i).unwrap();
            }
        });
    });

    let frames = sim.frames();
    assert_eq!(sim.discarded(), 0);
    assert_eq!(frames.len(), 1 + 4 * OPS_PER_THREAD as usize);

    let count = |pred: fn(&DecodedFrame) -> bool| frames.iter().filter(|f| pred(f)).count();
    assert_eq!(count(|f| matches!(f, DecodedFrame::Led { port: 1, .. })), 50);
    assert_eq!(count(|f| matches!(f, DecodedFrame::Servo { port: 2, .. })), 50);
    assert_eq!(count(|f| matches!(f, DecodedFrame::Motor { port: 1, .. })), 50);
    assert_eq!(
        count(|f| matches!(f, DecodedFrame::Vibration { port: 2, .. })),
        50
    );

    // Each thread's frames arrive in its own issue order, so the board
    // holds every thread's final value.
    let board = sim.board();
    assert_eq!(board.rejected, 0);
    assert_eq!(board.leds[0], percent_to_byte(OPS_PER_THREAD - 1));
    assert_eq!(board.servos[1], angle_to_byte((OPS_PER_THREAD - 1) * 3));
    assert_eq!(board.motors[0], speed_to_motor(OPS_PER_THREAD - 26));
    assert_eq!(board.vibration[1], percent_to_byte(OPS_PER_THREAD - 1));
    assert_eq!(bird.stats().busy_timeouts, 0);
}

#[test]
fn sensor_replies_stay_paired_with_their_query() {
    let (bird, sim) = contended_link();
    sim.set_sensor(FourPort::One, 128);
    sim.set_sensor(FourPort::Three, 255);
    bird.start().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..OPS_PER_THREAD {
                assert_eq!(bird.get_sensor(FourPort::One).unwrap(), 50);
            }
        });
        s.spawn(|| {
            for _ in 0..OPS_PER_THREAD {
                assert_eq!(bird.get_sensor(FourPort::Three).unwrap(), 100);
            }
        });
        s.spawn(|| {
            for i in 0..2 * OPS_PER_THREAD {
                bird.set_motor(TwoPort::Two, if i % 2 == 0 { 100 } else { -100 })
                    .unwrap();
            }
        });
    });

    assert_eq!(sim.pending_responses(), 0);
    assert_eq!(bird.stats().sensor_reads, 2 * OPS_PER_THREAD as u32);
    assert_eq!(sim.board().motors[1], (Direction::Reverse, 255));
}

#[test]
fn caller_waiting_on_the_start_gate_proceeds_once_started() {
    let (bird, sim) = contended_link();

    thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(20));
            bird.start().unwrap();
        });
        // Default gate waits about 250 ms, well past the 20 ms delay.
        bird.set_led(FourPort::Three, 100).unwrap();
    });

    assert_eq!(sim.wire_log(), [0x58, 0x4C, 0x32, 255]);
    assert_eq!(bird.stats().start_timeouts, 0);
}
