//! Fuzz target: `SerialDecoder::feed`
//!
//! Drives arbitrary byte sequences into the combined JSON/line stream
//! decoder and asserts that it never panics, never yields frames larger
//! than the fixed buffers, and recovers cleanly after a reset.
//!
//! cargo fuzz run fuzz_serial_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sleepsync::link::codec::{Frame, MAX_FRAME_LEN, MAX_LINE_LEN, SerialDecoder};

fuzz_target!(|data: &[u8]| {
    let mut decoder = SerialDecoder::new();

    for &byte in data {
        match decoder.feed(byte) {
            Ok(Some(Frame::Json(payload))) => {
                assert!(payload.len() <= MAX_FRAME_LEN, "frame exceeds MAX_FRAME_LEN");
                assert_eq!(payload.first(), Some(&b'{'), "JSON frame must open with brace");
                assert_eq!(payload.last(), Some(&b'}'), "JSON frame must close with brace");
            }
            Ok(Some(Frame::Line(token))) => {
                assert!(!token.is_empty(), "decoder must not yield empty tokens");
                assert!(token.len() <= MAX_LINE_LEN, "token exceeds MAX_LINE_LEN");
            }
            Ok(None) | Err(_) => {}
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    for &byte in data {
        let _ = decoder.feed(byte);
    }
});
