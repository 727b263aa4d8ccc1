use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::validation::{ELMK_NUMBER_DIGITS, SNILS_DIGITS, check_digit_field};

/// Request body for the medical book validation endpoint.
///
/// This is the raw wire shape; fields are unchecked until converted into a
/// [`ValidatedRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalBookRequest {
    /// 12-digit medical book (ELMK) number
    pub elmk_number: String,
    /// 11-digit SNILS number
    pub snils: String,
}

/// A lookup request whose fields have passed structural validation.
///
/// Fields are private so the digit-length pattern holds for the lifetime of
/// the value. Construct via [`ValidatedRequest::try_from`].
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    elmk_number: String,
    snils: String,
}

impl ValidatedRequest {
    pub fn elmk_number(&self) -> &str {
        &self.elmk_number
    }

    pub fn snils(&self) -> &str {
        &self.snils
    }
}

impl TryFrom<MedicalBookRequest> for ValidatedRequest {
    type Error = AppError;

    /// Validate both fields, collecting every violation so the response
    /// enumerates all offending fields at once.
    fn try_from(raw: MedicalBookRequest) -> AppResult<Self> {
        let mut violations = Vec::new();

        if let Err(message) = check_digit_field("elmk_number", &raw.elmk_number, ELMK_NUMBER_DIGITS)
        {
            violations.push(message);
        }
        if let Err(message) = check_digit_field("snils", &raw.snils, SNILS_DIGITS) {
            violations.push(message);
        }

        if violations.is_empty() {
            Ok(Self {
                elmk_number: raw.elmk_number,
                snils: raw.snils,
            })
        } else {
            Err(AppError::InvalidInput(violations.join("; ")))
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service health status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Service version
    pub version: String,
}

/// Placeholder body for the metrics endpoint.
#[derive(Debug, Serialize)]
pub struct MetricsPlaceholder {
    pub status: String,
    pub note: String,
}
