//! Fuzz target: `FrameDecoder::push`
//!
//! Drives arbitrary byte sequences into the peripheral-side decoder and
//! asserts that it never panics, never yields more frames than the input
//! could hold, and accounts for every byte.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use hummingbird::protocol::codec::FrameDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();
    let mut frames = 0usize;
    decoder.feed(data, |_| frames += 1);

    // Every frame consumes at least one byte.
    assert!(frames + decoder.discarded() <= data.len());

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    assert!(!decoder.is_mid_frame());
    decoder.feed(data, |_| {});
});
