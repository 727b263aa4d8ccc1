//! Shared application state for Axum handlers.
//!
//! The state is cloned per request handler; both members are cheap to clone
//! (`Arc` and a pooled HTTP client). Configuration is constructed once at
//! startup and reaches components only through this struct - there is no
//! ambient global settings lookup.

use std::sync::Arc;

use crate::config::Config;
use crate::registry::RegistryClient;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the external medical book registry
    pub registry: RegistryClient,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from a registry client and configuration.
    pub fn new(registry: RegistryClient, config: Config) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }
}
