//! Fuzz target for a single tagged attribute value.
//!
//! Exercises type-marker buffering and replay, collection decoding and the
//! unknown-tag fallback without the document wrapper around them.
//!
//! Run with:
//!   cargo +nightly fuzz run attribute_json_parse

#![no_main]

use annotext::codec::fuzz_decode_attribute;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_decode_attribute(json);
});
