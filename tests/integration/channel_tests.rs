//! Integration tests: strict API → channel → simulated board.

use core::time::Duration;

use hummingbird::adapters::sim::SimFaults;
use hummingbird::config::LinkConfig;
use hummingbird::error::{ChannelError, Error, TransportError};
use hummingbird::protocol::codec::DecodedFrame;
use hummingbird::protocol::scaling::Direction;
use hummingbird::{FourPort, TwoPort};

use super::fixtures::{after_handshake, fresh, fresh_with, now, started, started_with};

// ── Start / handshake ─────────────────────────────────────────

#[test]
fn start_sets_baud_and_sends_handshake() {
    let (bird, sim) = fresh();
    assert!(!bird.is_started());

    bird.start().unwrap();

    assert!(bird.is_started());
    assert_eq!(sim.baud(), Some(115_200));
    assert_eq!(sim.wire_log(), [0x58]);
    assert_eq!(sim.board().handshakes, 1);
}

#[test]
fn start_twice_sends_two_handshakes() {
    let (bird, sim) = fresh();
    bird.start().unwrap();
    bird.start().unwrap();

    assert!(bird.is_started());
    assert_eq!(sim.wire_log(), [0x58, 0x58]);
    assert_eq!(bird.stats().handshakes, 2);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let sim = hummingbird::adapters::sim::SimPeripheral::new();
    let cfg = LinkConfig {
        baud_rate: 0,
        ..LinkConfig::default()
    };
    let result = hummingbird::Hummingbird::new(
        sim,
        hummingbird::adapters::time::ManualClock::new(),
        cfg,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

// ── Encoding on the wire ──────────────────────────────────────

#[test]
fn led_brightness_is_clamped_before_scaling() {
    let (bird, sim) = started();
    bird.set_led(FourPort::One, 150).unwrap();
    bird.set_led(FourPort::Two, -10).unwrap();
    bird.set_led(FourPort::Four, 50).unwrap();

    assert_eq!(
        after_handshake(&sim),
        [0x4C, 0x30, 255, 0x4C, 0x31, 0, 0x4C, 0x33, 127]
    );
    assert_eq!(sim.board().leds, [255, 0, 0, 127]);
}

#[test]
fn servo_ninety_degrees_encodes_112() {
    let (bird, sim) = started();
    bird.set_servo(FourPort::Three, 90).unwrap();
    assert_eq!(after_handshake(&sim), [0x53, 0x32, 112]);
}

#[test]
fn motor_sign_selects_direction_byte() {
    let (bird, sim) = started();
    bird.set_motor(TwoPort::One, -50).unwrap();
    bird.set_motor(TwoPort::Two, 50).unwrap();

    assert_eq!(
        after_handshake(&sim),
        [0x4D, 0x30, 0x31, 127, 0x4D, 0x31, 0x30, 127]
    );
    assert_eq!(
        sim.board().motors,
        [(Direction::Reverse, 127), (Direction::Forward, 127)]
    );
}

#[test]
fn tri_led_and_vibration_reach_the_board() {
    let (bird, sim) = started();
    bird.set_tri_led(TwoPort::Two, 100, 0, 50).unwrap();
    bird.set_vibration_motor(TwoPort::One, 35).unwrap();

    let board = sim.board();
    assert_eq!(board.tri_leds[1], (255, 0, 127));
    assert_eq!(board.vibration, [89, 0]);
    assert_eq!(board.rejected, 0);
}

#[test]
fn chunked_transport_still_delivers_whole_frames() {
    let (bird, sim) = started();
    sim.set_faults(SimFaults {
        max_write_chunk: Some(1),
        ..SimFaults::default()
    });
    bird.set_tri_led(TwoPort::One, 10, 20, 30).unwrap();

    assert_eq!(
        sim.frames().last(),
        Some(&DecodedFrame::TriLed {
            port: 1,
            red: 25,
            green: 51,
            blue: 76
        })
    );
}

// ── Sensor reads ──────────────────────────────────────────────

#[test]
fn sensor_raw_byte_maps_to_percent() {
    let (bird, sim) = started();
    sim.set_sensor(FourPort::One, 255);
    sim.set_sensor(FourPort::Two, 0);
    sim.set_sensor(FourPort::Three, 128);

    assert_eq!(bird.get_sensor(FourPort::One).unwrap(), 100);
    assert_eq!(bird.get_sensor(FourPort::Two).unwrap(), 0);
    assert_eq!(bird.get_sensor(FourPort::Three).unwrap(), 50);

    assert_eq!(
        after_handshake(&sim),
        [0x74, 0x30, 0x74, 0x31, 0x74, 0x32]
    );
    assert_eq!(bird.stats().sensor_reads, 3);
}

#[test]
fn stale_reply_is_drained_before_query() {
    let (bird, sim) = started();
    sim.inject_response(&[9]);
    sim.set_sensor(FourPort::Four, 255);

    assert_eq!(bird.get_sensor(FourPort::Four).unwrap(), 100);
    assert_eq!(sim.pending_responses(), 0);
}

#[test]
fn muted_board_times_out_at_the_read_deadline() {
    let (bird, sim) = started();
    sim.set_faults(SimFaults {
        mute_responses: true,
        ..SimFaults::default()
    });

    let before = now(&bird);
    let err = bird.get_sensor(FourPort::One).unwrap_err();
    let waited = now(&bird) - before;

    assert_eq!(err, Error::Transport(TransportError::ReadTimeout));
    assert!(waited >= Duration::from_millis(100), "waited {waited:?}");
    assert!(waited < Duration::from_millis(110), "waited {waited:?}");
    assert_eq!(bird.stats().transport_errors, 1);
}

#[test]
fn per_call_deadline_cancels_a_hung_read() {
    let (bird, sim) = started();
    sim.set_faults(SimFaults {
        mute_responses: true,
        ..SimFaults::default()
    });

    let before = now(&bird);
    let err = bird
        .get_sensor_within(FourPort::Two, Duration::from_millis(20))
        .unwrap_err();
    let waited = now(&bird) - before;

    assert_eq!(err, Error::Transport(TransportError::ReadTimeout));
    assert!(waited >= Duration::from_millis(20));
    assert!(waited < Duration::from_millis(30));
}

#[test]
fn unbounded_read_deadline_does_not_overflow() {
    let (bird, sim) = started();
    bird.channel().clock().advance(Duration::from_millis(1));
    sim.set_sensor(FourPort::One, 255);

    assert_eq!(
        bird.get_sensor_within(FourPort::One, Duration::MAX),
        Ok(100)
    );
}

#[test]
fn post_read_pause_is_tunable() {
    for pause_ms in [0u32, 1, 5] {
        let (bird, sim) = started_with(LinkConfig {
            post_read_pause_ms: pause_ms,
            ..LinkConfig::default()
        });
        sim.set_sensor(FourPort::One, 10);

        let before = now(&bird);
        bird.get_sensor(FourPort::One).unwrap();
        assert_eq!(
            now(&bird) - before,
            Duration::from_millis(u64::from(pause_ms))
        );
    }
}

// ── Failure reporting ─────────────────────────────────────────

#[test]
fn operations_before_start_fail_after_the_gate() {
    let (bird, sim) = fresh();

    let before = now(&bird);
    let err = bird.set_led(FourPort::One, 50).unwrap_err();
    assert_eq!(err, Error::Channel(ChannelError::NotInitialized));
    assert_eq!(now(&bird) - before, Duration::from_millis(250));

    let err = bird.get_sensor(FourPort::One).unwrap_err();
    assert_eq!(err, Error::Channel(ChannelError::NotInitialized));

    assert!(sim.wire_log().is_empty());
    assert_eq!(bird.stats().start_timeouts, 2);
}

#[test]
fn start_gate_length_follows_config() {
    let (bird, _sim) = fresh_with(LinkConfig {
        start_poll_attempts: 3,
        start_poll_interval_ms: 7,
        ..LinkConfig::default()
    });
    let before = now(&bird);
    assert!(bird.set_servo(FourPort::One, 0).is_err());
    assert_eq!(now(&bird) - before, Duration::from_millis(21));
}

#[test]
fn held_lock_surfaces_busy_timeout() {
    let (bird, sim) = started();

    let guard = bird.channel().acquire().unwrap();
    let before = now(&bird);
    let err = bird.set_motor(TwoPort::One, 100).unwrap_err();
    let waited = now(&bird) - before;
    drop(guard);

    assert_eq!(err, Error::Channel(ChannelError::BusyTimeout));
    assert!(waited >= Duration::from_millis(250));
    assert_eq!(after_handshake(&sim), Vec::<u8>::new());
    assert_eq!(bird.stats().busy_timeouts, 1);

    // Released guard lets the next caller through.
    bird.set_motor(TwoPort::One, 100).unwrap();
    assert_eq!(after_handshake(&sim), [0x4D, 0x30, 0x30, 255]);
}

#[test]
fn write_failure_is_reported_not_swallowed() {
    let (bird, sim) = started();
    sim.set_faults(SimFaults {
        fail_writes: true,
        ..SimFaults::default()
    });

    let err = bird.set_vibration_motor(TwoPort::Two, 20).unwrap_err();
    assert_eq!(err, Error::Transport(TransportError::WriteFailed));
    assert_eq!(bird.stats().transport_errors, 1);
    assert_eq!(bird.stats().frames_sent, 0);
}

#[test]
fn read_failure_is_reported() {
    let (bird, sim) = started();
    sim.set_faults(SimFaults {
        fail_reads: true,
        ..SimFaults::default()
    });

    let err = bird.get_sensor(FourPort::One).unwrap_err();
    assert_eq!(err, Error::Transport(TransportError::ReadFailed));
}

#[test]
fn stats_count_frames_and_bytes() {
    let (bird, sim) = started();
    sim.set_sensor(FourPort::One, 1);
    bird.set_led(FourPort::One, 1).unwrap();
    bird.set_tri_led(TwoPort::One, 1, 2, 3).unwrap();
    bird.get_sensor(FourPort::One).unwrap();

    let s = bird.stats();
    assert_eq!(s.handshakes, 1);
    assert_eq!(s.frames_sent, 3);
    assert_eq!(s.bytes_sent, 3 + 5 + 2);
    assert_eq!(s.sensor_reads, 1);
}
