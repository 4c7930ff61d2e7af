//! LLM-backed product health assessment engine for checkit
//!
//! Takes the raw product attributes from the catalog, builds a deterministic
//! prompt, calls a chat-completion endpoint with temperature pinned to zero,
//! and validates the returned text into the canonical [`ProductAssessment`]
//! record. Temperature 0 is a correctness requirement, not a style choice:
//! identical product input must yield the same assessment across repeated
//! runs, which is the property both caching and the test suite rely on.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use checkit_catalog::RawProductInfo;

mod model;
mod normalize;
pub mod prompt;

pub use model::{Additive, Citation, IngredientEntry, ProductAssessment, QuickFact, Severity};
pub use normalize::{normalize, AssessmentBody, SchemaError};
pub use prompt::PROMPT_VERSION;

/// Default chat-completion endpoint base.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Default output-token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// エラー型
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// No API credential was configured. Raised eagerly at construction,
    /// never discovered lazily on the first call.
    #[error("no API credential configured for the assessment engine")]
    MissingCredential,

    /// Transport-level failure, including timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("chat completion API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The completion envelope contained no choices.
    #[error("completion contained no choices")]
    EmptyCompletion,

    /// The completion's text content is not valid JSON. No partial
    /// extraction or repair is attempted.
    #[error("malformed assessment response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The completion parsed as JSON but violates the assessment schema.
    #[error("assessment schema violation: {0}")]
    Schema(#[from] SchemaError),

    /// The configured base URL could not be parsed.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Configuration for the assessment engine.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AssessmentConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            ..Self::default()
        }
    }

    /// Set the endpoint base URL.
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, value: &str) -> Self {
        self.model = value.to_string();
        self
    }

    /// Set the output-token budget.
    pub fn with_max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = value;
        self
    }

    /// Set the per-request timeout (default: 30 seconds).
    pub fn with_timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Chat-completion backed assessment client.
pub struct AssessmentClient {
    base_url: Url,
    config: AssessmentConfig,
    http_client: Client,
}

impl AssessmentClient {
    /// Create a new assessment client, validating the credential and base
    /// URL up front.
    pub fn new(config: AssessmentConfig, http_client: Client) -> Result<Self, AssessmentError> {
        if config.api_key.is_empty() {
            return Err(AssessmentError::MissingCredential);
        }
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            config,
            http_client,
        })
    }

    /// Assess a product, returning the canonical record with a fresh id.
    ///
    /// Fails when the upstream call errors or when the returned text does
    /// not satisfy the assessment schema. No retry is performed here: the
    /// call is billed, so retrying stays an explicit caller decision.
    pub async fn assess(
        &self,
        product: &RawProductInfo,
    ) -> Result<ProductAssessment, AssessmentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AssessmentError::Url(url::ParseError::EmptyHost))?
            .pop_if_empty()
            .push("chat")
            .push("completions");
        let request_body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": prompt::SYSTEM_MESSAGE},
                {"role": "user", "content": prompt::build_prompt(product)}
            ],
            // Pinned to zero so identical input yields identical output.
            "temperature": 0,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssessmentError::Api { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or(AssessmentError::EmptyCompletion)?
            .message
            .content;

        debug!(barcode = %product.barcode, bytes = content.len(), "parsing assessment");
        let parsed: serde_json::Value =
            serde_json::from_str(&content).map_err(AssessmentError::MalformedResponse)?;

        let body = normalize(&parsed, product)?;
        Ok(ProductAssessment {
            id: model::next_scan_id(),
            name: body.name,
            brand: body.brand,
            image: body.image,
            quick_facts: body.quick_facts,
            harmful_additives: body.harmful_additives,
            ingredients: body.ingredients,
            scientific_evidence: body.scientific_evidence,
        })
    }
}
