//! Fuzz harness for classification response bodies
//!
//! Decoding arbitrary bytes must fail cleanly, and filtering a decoded
//! result must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use witintent_schema::ClassificationResult;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut result) = ClassificationResult::from_slice(data) {
        let names = result.intent_names(0.5);
        result.retain_above(0.5);
        assert_eq!(names.len(), result.intents().len());
    }
});
