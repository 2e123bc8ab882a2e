//! Fuzz target: `DetectorConfig::from_json`
//!
//! Arbitrary bytes must either parse into a configuration that passes
//! validation or be rejected with an error.  Never a panic.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use magdetect::config::DetectorConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = DetectorConfig::from_json(text) {
        assert!(config.validate().is_ok());
    }
});
