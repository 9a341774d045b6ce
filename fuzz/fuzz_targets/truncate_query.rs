//! Fuzz harness for query truncation
//!
//! Output stays within 263 code points and keeps the input as a prefix.

#![no_main]

use libfuzzer_sys::fuzz_target;
use witintent_sanitize::{truncate_query, MAX_QUERY_CHARS};

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    let out = truncate_query(input);
    assert!(out.chars().count() <= MAX_QUERY_CHARS + 3);
    let kept: String = input.chars().take(MAX_QUERY_CHARS).collect();
    assert!(out.starts_with(&kept));
});
