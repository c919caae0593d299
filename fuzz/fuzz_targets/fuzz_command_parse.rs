//! Fuzz target: command parsing
//!
//! Feeds arbitrary bytes through both the JSON command parser and (when
//! they form valid UTF-8) the plain-text token parser.  Neither may
//! panic, and every rejection must keep its echo name within bounds.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use sleepsync::app::commands::{parse_json, parse_token};

fuzz_target!(|data: &[u8]| {
    match parse_json(data) {
        Ok(parsed) => assert!(!parsed.name.is_empty()),
        Err(failure) => assert!(failure.name.len() <= 32),
    }

    if let Ok(text) = core::str::from_utf8(data) {
        let _ = parse_token(text);
    }
});
