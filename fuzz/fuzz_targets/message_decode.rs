//! Fuzz target for Message deserialization
//!
//! Exercises the DTO conversion layer directly: routing-field
//! validation, nullable username handling, and timestamp parsing must
//! reject malformed input with an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use palaver_proto::Message;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<Message>(text);
    }
});
