//! Fuzz target for property path parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_path_parser
//! ```

#![no_main]

use dynpred_query::{FilterError, PropertyPath};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    match PropertyPath::parse(input) {
        Ok(path) => {
            // A parsed path prints back to its input and has no empty segment
            assert_eq!(path.to_string(), input);
            assert!(!path.is_empty());
            assert_eq!(path.len(), input.split('.').count());
        }
        Err(err) => assert!(matches!(err, FilterError::InvalidPath { .. })),
    }
});
