//! Fuzz target for untagged morphological analysis arrays.
//!
//! Run with:
//!   cargo +nightly fuzz run morpho_json_parse

#![no_main]

use annotext::codec::analyses_from_json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    // Errors are fine; panics are not.
    let _ = analyses_from_json(json);
});
