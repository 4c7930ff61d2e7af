//! Configuration for the checkit pipeline
//!
//! One explicit configuration object carries the endpoints and credentials
//! for all three collaborators. Credentials are validated eagerly when the
//! client is constructed, never discovered lazily on the first call.

use std::time::Duration;

use checkit_assessment::AssessmentConfig;
use checkit_catalog::DEFAULT_CATALOG_URL;

use crate::error::Error;

/// Configuration for a [`crate::Checkit`] client.
#[derive(Debug, Clone)]
pub struct CheckitConfig {
    /// Base URL of the product catalog (defaults to the public Open Food
    /// Facts endpoint).
    pub catalog_url: String,

    /// Per-request timeout for catalog lookups.
    pub catalog_timeout: Duration,

    /// Assessment engine configuration (endpoint, credential, model,
    /// token budget, timeout).
    pub assessment: AssessmentConfig,

    /// Base URL of the Supabase project used for persistence.
    pub supabase_url: String,

    /// Supabase anon key.
    pub supabase_key: String,

    /// Per-request timeout for persistence calls.
    pub store_timeout: Duration,
}

impl CheckitConfig {
    /// Create a configuration from the three required credentials/endpoints.
    pub fn new(openai_api_key: &str, supabase_url: &str, supabase_key: &str) -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_timeout: Duration::from_secs(5),
            assessment: AssessmentConfig::new(openai_api_key),
            supabase_url: supabase_url.to_string(),
            supabase_key: supabase_key.to_string(),
            store_timeout: Duration::from_secs(10),
        }
    }

    /// Attempts to create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let openai_api_key = require_env("CHECKIT_OPENAI_API_KEY")?;
        let supabase_url = require_env("CHECKIT_SUPABASE_URL")?;
        let supabase_key = require_env("CHECKIT_SUPABASE_KEY")?;
        Ok(Self::new(&openai_api_key, &supabase_url, &supabase_key))
    }

    /// Set the catalog base URL.
    pub fn with_catalog_url(mut self, value: &str) -> Self {
        self.catalog_url = value.to_string();
        self
    }

    /// Set the catalog lookup timeout.
    pub fn with_catalog_timeout(mut self, value: Duration) -> Self {
        self.catalog_timeout = value;
        self
    }

    /// Replace the assessment engine configuration.
    pub fn with_assessment(mut self, value: AssessmentConfig) -> Self {
        self.assessment = value;
        self
    }

    /// Set the persistence timeout.
    pub fn with_store_timeout(mut self, value: Duration) -> Self {
        self.store_timeout = value;
        self
    }
}

fn require_env(name: &str) -> Result<String, Error> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("{} environment variable not found", name)))
}
