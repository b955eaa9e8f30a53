//! Fuzz target for `dynpred.toml` parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use dynpred_schema::FilterConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(config) = FilterConfig::from_str(input) {
            assert!(config.paths.max_depth >= 1);
        }
    }
});
