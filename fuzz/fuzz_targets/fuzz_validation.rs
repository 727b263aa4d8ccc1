//! Fuzz testing for the input validation functions.
//!
//! This fuzz target tests the robustness of the validation module against
//! arbitrary input strings. It ensures that validation functions:
//!
//! - Never panic on any input
//! - Always return a valid Result (Ok or Err)
//! - Handle edge cases like empty strings, long strings, non-ASCII digits,
//!   and embedded control characters
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! # Install cargo-fuzz (requires nightly)
//! cargo +nightly install cargo-fuzz
//!
//! # Run the validation fuzz target
//! cargo +nightly fuzz run fuzz_validation
//!
//! # Run with a time limit (e.g., 60 seconds)
//! cargo +nightly fuzz run fuzz_validation -- -max_total_time=60
//! ```
//!
//! # What This Tests
//!
//! - `validate_elmk_number`: 12-digit medical book number validation
//! - `validate_snils`: 11-digit national insurance number validation

#![no_main]

use elmk_gateway::validation::{validate_elmk_number, validate_snils};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to interpret the bytes as a UTF-8 string for field validation
    if let Ok(s) = std::str::from_utf8(data) {
        // Neither validator may panic, whatever the input
        let _ = validate_elmk_number(s);
        let _ = validate_snils(s);
    }
});
