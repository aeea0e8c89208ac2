//! Fuzz target for document JSON decoding.
//!
//! This fuzzer feeds arbitrary byte sequences to the document decoder,
//! which also runs the version gate and any legacy migration, and encodes
//! whatever decodes.
//!
//! Run with:
//!   cargo +nightly fuzz run document_json_parse
//!
//! Or with a corpus:
//!   cargo +nightly fuzz run document_json_parse fuzz/corpus/document_json_parse/

#![no_main]

use annotext::{from_json_slice, to_json_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(document) = from_json_slice(data) else {
        return;
    };
    let _ = to_json_string(&document);
});
