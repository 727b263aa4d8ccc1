//! Client for the external medical book registry.
//!
//! Issues exactly one outbound call per accepted validation request and maps
//! the result into the application error taxonomy. There is no retry, no
//! backoff, and no caching: the pipeline decides what to do with an error
//! outcome.
//!
//! TLS certificate validation stays at the reqwest default (enabled).
//! Running against a registry endpoint with an untrusted certificate is an
//! unsupported deployment.

use reqwest::StatusCode;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::RegistryRecord;

/// HTTP client for the registry, holding the configured base endpoint.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool
/// across clones.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Build a client with the call-level timeout from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the underlying HTTP client cannot be
    /// constructed (e.g., no TLS backend available).
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.external_api_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build registry client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.external_api_url.clone(),
        })
    }

    /// Look up a medical book record by ELMK number and SNILS.
    ///
    /// Performs a single GET with both parameters in the query string. A 2xx
    /// payload is deserialized strictly into [`RegistryRecord`]; any missing
    /// or mistyped field is a malformed-response error, never a partial
    /// result.
    pub async fn lookup(&self, elmk_number: &str, snils: &str) -> AppResult<RegistryRecord> {
        info!(
            elmk_number,
            snils,
            url = %self.base_url,
            "Requesting external registry"
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("elmk_number", elmk_number), ("snils", snils)])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            elmk_number, "Registry response received"
        );

        classify_status(status)?;

        // Body reads can also time out; classify those like the send itself
        let body = response.bytes().await.map_err(classify_transport_error)?;

        serde_json::from_slice(&body).map_err(|e| {
            error!(
                error = %e,
                elmk_number,
                "Registry payload failed strict deserialization"
            );
            AppError::UpstreamMalformedResponse(e.to_string())
        })
    }
}

/// Map a non-success registry status onto the error taxonomy.
fn classify_status(status: StatusCode) -> AppResult<()> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(AppError::UpstreamNotFound)
    } else {
        Err(AppError::UpstreamFault(status.as_u16()))
    }
}

/// Map a reqwest transport failure onto the error taxonomy.
fn classify_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::UpstreamTimeout
    } else if e.is_connect() {
        AppError::UpstreamUnreachable(e.to_string())
    } else {
        AppError::Internal(format!("registry transport error: {e}"))
    }
}
