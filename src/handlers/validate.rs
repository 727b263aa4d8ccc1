//! Medical book validation endpoint.
//!
//! `POST /api/v1/medical-book/validate` - the one business operation of the
//! gateway. Basic-Auth is declared as an extractor dependency, structural
//! validation runs before any outbound traffic, and the registry is called
//! exactly once per accepted request.

use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::auth::AuthenticatedUser;
use crate::error::AppResult;
use crate::models::{MedicalBookRequest, RegistryRecord, ValidatedRequest};
use crate::state::AppState;

/// Validate a medical book against the external registry.
///
/// # Request Body
///
/// ```json
/// {
///   "elmk_number": "860102797025",
///   "snils": "17648922116"
/// }
/// ```
///
/// # Responses
///
/// - 200 with the full [`RegistryRecord`] on a match
/// - 422 when either field fails the digit-length pattern (no upstream call)
/// - 404/502/503/504 relaying the classified upstream outcome
#[instrument(skip(state, user, payload))]
pub async fn validate_medical_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MedicalBookRequest>,
) -> AppResult<Json<RegistryRecord>> {
    // Rejects before the registry is involved; the error enumerates every
    // offending field
    let request = ValidatedRequest::try_from(payload)?;

    info!(
        elmk_number = request.elmk_number(),
        snils = request.snils(),
        user = %user,
        "Medical book validation request"
    );

    let record = state
        .registry
        .lookup(request.elmk_number(), request.snils())
        .await?;

    info!(
        elmk_number = request.elmk_number(),
        user = %user,
        "Medical book validation successful"
    );

    Ok(Json(record))
}
