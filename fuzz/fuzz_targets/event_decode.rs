//! Fuzz target for ServerEvent::decode
//!
//! This fuzzer tests event-envelope decoding with arbitrary input to
//! find:
//! - Parser crashes or panics
//! - Unknown event names that bypass the typed error path
//! - Payloads that violate the exactly-one-routing-field rule
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an
//! error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use palaver_proto::ServerEvent;

fuzz_target!(|data: &[u8]| {
    // Attempt to decode arbitrary bytes as an event envelope
    // This should never panic, only return Err for invalid data
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ServerEvent::decode(text);
    }
});
