//! Shared setup: a Hummingbird wired to a simulated board and a manual
//! clock, so timeouts elapse instantly and deterministically.

#![allow(dead_code)]

use hummingbird::Hummingbird;
use hummingbird::adapters::sim::SimPeripheral;
use hummingbird::adapters::time::ManualClock;
use hummingbird::app::ports::Clock;
use hummingbird::config::LinkConfig;

use core::time::Duration;

pub type SimBird = Hummingbird<SimPeripheral, ManualClock>;

/// Not yet started.
pub fn fresh_with(config: LinkConfig) -> (SimBird, SimPeripheral) {
    let sim = SimPeripheral::new();
    let bird = Hummingbird::new(sim.clone(), ManualClock::new(), config)
        .expect("test config is valid");
    (bird, sim)
}

pub fn fresh() -> (SimBird, SimPeripheral) {
    fresh_with(LinkConfig::default())
}

/// Started, handshake already on the wire.
pub fn started_with(config: LinkConfig) -> (SimBird, SimPeripheral) {
    let (bird, sim) = fresh_with(config);
    bird.start().expect("start on a healthy link");
    (bird, sim)
}

pub fn started() -> (SimBird, SimPeripheral) {
    started_with(LinkConfig::default())
}

/// Wire bytes written after the handshake.
pub fn after_handshake(sim: &SimPeripheral) -> Vec<u8> {
    let log = sim.wire_log();
    assert_eq!(log.first(), Some(&0x58), "handshake must lead the wire");
    log[1..].to_vec()
}

pub fn now(bird: &SimBird) -> Duration {
    bird.channel().clock().now()
}
