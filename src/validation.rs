//! Structural validation for lookup request fields.
//!
//! Both identifiers are fixed-length all-digit strings. Validation happens at
//! the API boundary, before any outbound registry call is made.

use crate::error::{AppError, AppResult};

// =============================================================================
// Validation Constants
// =============================================================================

/// Required length of an ELMK registry number.
pub const ELMK_NUMBER_DIGITS: usize = 12;

/// Required length of a SNILS national insurance number.
pub const SNILS_DIGITS: usize = 11;

/// Validate an ELMK registry number (exactly 12 ASCII digits).
pub fn validate_elmk_number(value: &str) -> AppResult<()> {
    check_digit_field("elmk_number", value, ELMK_NUMBER_DIGITS)
        .map_err(AppError::InvalidInput)
}

/// Validate a SNILS number (exactly 11 ASCII digits).
pub fn validate_snils(value: &str) -> AppResult<()> {
    check_digit_field("snils", value, SNILS_DIGITS).map_err(AppError::InvalidInput)
}

/// Check a single field against the exact-length all-digit pattern.
///
/// Returns the violation message on failure so callers can collect messages
/// for several fields into one response.
pub(crate) fn check_digit_field(field: &str, value: &str, digits: usize) -> Result<(), String> {
    // Byte length equals char count only for ASCII, so check digits first
    if value.bytes().all(|b| b.is_ascii_digit()) && value.len() == digits {
        Ok(())
    } else {
        Err(format!("{field} must be exactly {digits} digits"))
    }
}
