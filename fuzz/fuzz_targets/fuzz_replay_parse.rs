//! Fuzz target: scenario and config decoding
//!
//! Feeds arbitrary bytes to `ReplaySource::parse` (as UTF-8 text) and to
//! `FloodConfig::from_bytes`.
//!
//! Invariants checked:
//! - No panics under arbitrary input
//! - A parsed scenario never holds more polls than the text has lines
//! - A config that decodes has always passed validation
//!
//! cargo fuzz run fuzz_replay_parse

#![no_main]

use floodsaver::FloodConfig;
use floodsaver::adapters::replay::ReplaySource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(src) = ReplaySource::parse(text) {
            assert!(src.remaining() <= text.lines().count());
        }
    }

    if let Ok(config) = FloodConfig::from_bytes(data) {
        assert_eq!(config.validate(), Ok(()));
    }
});
