//! Supabase-backed persistence for checkit
//!
//! Thin PostgREST client for the three tables the app owns: `scans`,
//! `saved_products`, and `profiles`. Every operation takes an explicit
//! opaque user id obtained from a separate authentication flow; this crate
//! knows nothing about sessions. The persisted `product_data` column holds
//! the full serialized [`ProductAssessment`].

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use checkit_assessment::ProductAssessment;

/// エラー型
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result of persisting a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// `false` when an existing scan of the same product was refreshed.
    pub is_new: bool,
}

/// Result of saving a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// A previously persisted scan, newest first in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedProduct {
    pub scan_id: i64,
    pub scanned_at: DateTime<Utc>,
    pub product: ProductAssessment,
}

/// A previously saved product.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedProduct {
    pub saved_at: DateTime<Utc>,
    pub product: ProductAssessment,
}

/// A user profile row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub username: String,
    pub onboarding_completed: bool,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ScanRow {
    id: i64,
    scanned_at: DateTime<Utc>,
    product_data: ProductAssessment,
}

#[derive(Debug, Deserialize)]
struct SavedRow {
    saved_at: DateTime<Utc>,
    product_data: ProductAssessment,
}

/// PostgREST クライアント
pub struct StoreClient {
    base_url: Url,
    api_key: String,
    http_client: Client,
    timeout: Duration,
}

impl StoreClient {
    /// Create a new store client for a Supabase project.
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Result<Self, StoreError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key: api_key.to_string(),
            http_client,
            timeout: Duration::from_secs(10),
        })
    }

    /// Set the per-request timeout (default: 10 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(url::ParseError::EmptyHost))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        Ok(url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        Ok(response)
    }

    /// Persist a scan, refreshing the timestamp when the same product was
    /// already scanned by this user.
    pub async fn save_scan(
        &self,
        user_id: &str,
        product: &ProductAssessment,
    ) -> Result<ScanOutcome, StoreError> {
        let url = self.table_url("scans")?;

        let existing: Vec<IdRow> = Self::check(
            self.request(self.http_client.get(url.clone()))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("product_id", format!("eq.{}", product.id)),
                    ("select", "id".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        if let Some(row) = existing.first() {
            debug!(user_id, product_id = %product.id, "refreshing existing scan");
            Self::check(
                self.request(self.http_client.patch(url))
                    .query(&[("id", format!("eq.{}", row.id))])
                    .json(&json!({
                        "scanned_at": Utc::now(),
                        "product_data": product,
                    }))
                    .send()
                    .await?,
            )
            .await?;
            return Ok(ScanOutcome { is_new: false });
        }

        Self::check(
            self.request(self.http_client.post(url))
                .json(&json!({
                    "user_id": user_id,
                    "product_id": product.id,
                    "product_data": product,
                    "scanned_at": Utc::now(),
                }))
                .send()
                .await?,
        )
        .await?;
        Ok(ScanOutcome { is_new: true })
    }

    /// List this user's scans, newest first.
    pub async fn list_scans(&self, user_id: &str) -> Result<Vec<ScannedProduct>, StoreError> {
        let rows: Vec<ScanRow> = Self::check(
            self.request(self.http_client.get(self.table_url("scans")?))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("select", "*".to_string()),
                    ("order", "scanned_at.desc".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ScannedProduct {
                scan_id: row.id,
                scanned_at: row.scanned_at,
                product: row.product_data,
            })
            .collect())
    }

    /// Save a product to the user's list unless it is already there.
    pub async fn save_product(
        &self,
        user_id: &str,
        product: &ProductAssessment,
    ) -> Result<SaveOutcome, StoreError> {
        let url = self.table_url("saved_products")?;

        let existing: Vec<IdRow> = Self::check(
            self.request(self.http_client.get(url.clone()))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("product_id", format!("eq.{}", product.id)),
                    ("select", "id".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        if !existing.is_empty() {
            return Ok(SaveOutcome::AlreadySaved);
        }

        Self::check(
            self.request(self.http_client.post(url))
                .json(&json!({
                    "user_id": user_id,
                    "product_id": product.id,
                    "product_data": product,
                    "saved_at": Utc::now(),
                }))
                .send()
                .await?,
        )
        .await?;
        Ok(SaveOutcome::Saved)
    }

    /// Remove a product from the user's saved list.
    pub async fn unsave_product(&self, user_id: &str, product_id: &str) -> Result<(), StoreError> {
        Self::check(
            self.request(self.http_client.delete(self.table_url("saved_products")?))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("product_id", format!("eq.{}", product_id)),
                ])
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    /// List this user's saved products, newest first.
    pub async fn list_saved_products(
        &self,
        user_id: &str,
    ) -> Result<Vec<SavedProduct>, StoreError> {
        let rows: Vec<SavedRow> = Self::check(
            self.request(self.http_client.get(self.table_url("saved_products")?))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("select", "*".to_string()),
                    ("order", "saved_at.desc".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SavedProduct {
                saved_at: row.saved_at,
                product: row.product_data,
            })
            .collect())
    }

    /// Check whether a product is in the user's saved list.
    pub async fn is_product_saved(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> Result<bool, StoreError> {
        let rows: Vec<IdRow> = Self::check(
            self.request(self.http_client.get(self.table_url("saved_products")?))
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("product_id", format!("eq.{}", product_id)),
                    ("select", "id".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;
        Ok(!rows.is_empty())
    }

    /// Create a profile row for a new user.
    pub async fn create_profile(&self, user_id: &str, username: &str) -> Result<(), StoreError> {
        Self::check(
            self.request(self.http_client.post(self.table_url("profiles")?))
                .json(&json!({
                    "id": user_id,
                    "username": username,
                    "onboarding_completed": false,
                }))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    /// Fetch a user's profile; `None` when no row exists yet.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let rows: Vec<Profile> = Self::check(
            self.request(self.http_client.get(self.table_url("profiles")?))
                .query(&[
                    ("id", format!("eq.{}", user_id)),
                    ("select", "username,onboarding_completed".to_string()),
                ])
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;
        Ok(rows.into_iter().next())
    }

    /// Mark the user's onboarding as completed.
    pub async fn mark_onboarding_complete(&self, user_id: &str) -> Result<(), StoreError> {
        Self::check(
            self.request(self.http_client.patch(self.table_url("profiles")?))
                .query(&[("id", format!("eq.{}", user_id))])
                .json(&json!({ "onboarding_completed": true }))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }
}
