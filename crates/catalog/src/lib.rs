//! Open Food Facts product lookup client for checkit
//!
//! This crate resolves a scanned barcode into a [`RawProductInfo`] record:
//! display name, brand, ingredient text, a formatted nutrition summary, and
//! a curated product image. Lookup never fails from the caller's point of
//! view; any failure collapses into a fully-populated sentinel record so the
//! rest of the analysis pipeline can proceed with partial information.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

mod images;
mod nutrition;

pub use images::resolve_image;
pub use nutrition::Nutriments;

/// Default public Open Food Facts endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://world.openfoodfacts.org";

/// Sentinel used when the catalog has no display name for a product.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
/// Sentinel used when the catalog has no brand for a product.
pub const UNKNOWN_BRAND: &str = "Unknown Brand";
/// Sentinel ingredient text for a barcode the catalog does not know.
pub const SCAN_MANUALLY: &str = "Please scan ingredient list manually";
/// Sentinel ingredient text when the catalog could not be reached at all.
pub const INFO_UNAVAILABLE: &str = "Product information not available";
/// Sentinel ingredient text for a known product with no ingredient data.
pub const INGREDIENTS_UNAVAILABLE: &str = "Ingredients not available";
/// Sentinel nutrition summary when no nutrient table is available.
pub const NUTRITION_UNAVAILABLE: &str = "Nutrition facts not available";

/// Internal error taxonomy for a catalog lookup.
///
/// These never cross the `lookup` boundary; they exist so the absorbed
/// failure can still be logged with its actual cause.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog answered but reported the barcode as unknown (status 0).
    #[error("barcode not found in catalog")]
    NotFound,

    /// Transport-level failure: unreachable host, timeout, non-2xx status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a body that could not be decoded.
    #[error("malformed catalog response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The configured base URL could not be parsed.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Raw product attributes resolved from the catalog.
///
/// Every field is always populated; failure states are represented by the
/// sentinel strings above, never by absence, so downstream consumers need no
/// null-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProductInfo {
    pub name: String,
    pub brand: String,
    pub ingredients_text: String,
    pub nutrition_summary: String,
    pub image_url: String,
    pub barcode: String,
}

impl RawProductInfo {
    /// Sentinel record for a failed lookup. The ingredient text differs by
    /// cause so the model can ask the user to scan the label when the
    /// barcode is genuinely unknown.
    fn sentinel(barcode: &str, ingredients_text: &str) -> Self {
        Self {
            name: UNKNOWN_PRODUCT.to_string(),
            brand: UNKNOWN_BRAND.to_string(),
            ingredients_text: ingredients_text.to_string(),
            nutrition_summary: NUTRITION_UNAVAILABLE.to_string(),
            image_url: resolve_image(UNKNOWN_PRODUCT, UNKNOWN_BRAND).to_string(),
            barcode: barcode.to_string(),
        }
    }

    /// Record for a free-text product name with no catalog data behind it.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            brand: UNKNOWN_BRAND.to_string(),
            ingredients_text: INGREDIENTS_UNAVAILABLE.to_string(),
            nutrition_summary: NUTRITION_UNAVAILABLE.to_string(),
            image_url: resolve_image(name, UNKNOWN_BRAND).to_string(),
            barcode: "Not available".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    status: i64,
    product: Option<CatalogProduct>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogProduct {
    product_name: Option<String>,
    brands: Option<String>,
    ingredients_text: Option<String>,
    nutriments: Option<Nutriments>,
}

/// Open Food Facts クライアント
pub struct CatalogClient {
    base_url: Url,
    http_client: Client,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a new catalog client against a given base URL.
    pub fn new(base_url: &str, http_client: Client) -> Result<Self, CatalogError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http_client,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set the per-request timeout (default: 5 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a barcode, always resolving to a populated record.
    ///
    /// Lookup failure is not escalated: a not-found barcode, an unreachable
    /// catalog, and an undecodable body all collapse into the sentinel
    /// record, and the pipeline proceeds with partial information. The
    /// distinguishing cause is retained in the logs.
    pub async fn lookup(&self, barcode: &str) -> RawProductInfo {
        match self.fetch_product(barcode).await {
            Ok(info) => {
                debug!(%barcode, name = %info.name, "catalog lookup succeeded");
                info
            }
            Err(CatalogError::NotFound) => {
                warn!(%barcode, "barcode not found in catalog, using sentinel record");
                RawProductInfo::sentinel(barcode, SCAN_MANUALLY)
            }
            Err(err) => {
                warn!(%barcode, error = %err, "catalog lookup failed, using sentinel record");
                RawProductInfo::sentinel(barcode, INFO_UNAVAILABLE)
            }
        }
    }

    /// Fallible lookup against the catalog API.
    async fn fetch_product(&self, barcode: &str) -> Result<RawProductInfo, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Url(url::ParseError::EmptyHost))?
            .pop_if_empty()
            .extend(["api", "v0", "product"])
            .push(&format!("{}.json", barcode));

        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let decoded: CatalogResponse = serde_json::from_str(&text)?;

        if decoded.status != 1 {
            return Err(CatalogError::NotFound);
        }

        let product = decoded.product.unwrap_or_default();
        let name = product
            .product_name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
        let brand = product
            .brands
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_string());
        let image_url = resolve_image(&name, &brand).to_string();

        Ok(RawProductInfo {
            ingredients_text: product
                .ingredients_text
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| INGREDIENTS_UNAVAILABLE.to_string()),
            nutrition_summary: nutrition::format_nutrition(product.nutriments.as_ref()),
            name,
            brand,
            image_url,
            barcode: barcode.to_string(),
        })
    }
}
