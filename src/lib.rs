//! checkit — food product analysis pipeline
//!
//! Composes three external collaborators into a single caller-facing flow:
//! barcode → Open Food Facts lookup → LLM health assessment → validated
//! [`ProductAssessment`], with Supabase-backed persistence of scans, saved
//! products, and user profiles.
//!
//! Data flows strictly one way, one request per user action; the two
//! network calls are the only suspension points. Catalog failures never
//! surface (the pipeline continues with sentinel data); assessment and
//! schema failures do, as a single retryable error taxonomy.

pub mod config;
pub mod error;

use reqwest::Client;
use tracing::debug;

use checkit_assessment::AssessmentClient;
use checkit_catalog::{CatalogClient, RawProductInfo};
use checkit_store::StoreClient;

pub use crate::config::CheckitConfig;
pub use crate::error::Error;
pub use checkit_assessment::{
    Additive, AssessmentConfig, AssessmentError, Citation, IngredientEntry, ProductAssessment,
    QuickFact, SchemaError, Severity, PROMPT_VERSION,
};
pub use checkit_store::{Profile, SaveOutcome, SavedProduct, ScanOutcome, ScannedProduct};

/// The main entry point for the checkit pipeline.
pub struct Checkit {
    catalog: CatalogClient,
    assessment: AssessmentClient,
    store: StoreClient,
}

impl Checkit {
    /// Create a new checkit client from a validated configuration.
    ///
    /// Fails fast on a missing assessment credential or an unparsable base
    /// URL; nothing is deferred to the first call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use checkit::{Checkit, CheckitConfig};
    ///
    /// # fn run() -> Result<(), checkit::Error> {
    /// let config = CheckitConfig::new(
    ///     "sk-your-openai-key",
    ///     "https://your-project.supabase.co",
    ///     "your-anon-key",
    /// );
    /// let checkit = Checkit::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: CheckitConfig) -> Result<Self, Error> {
        let http_client = Client::new();

        let catalog = CatalogClient::new(&config.catalog_url, http_client.clone())
            .map_err(|e| Error::Config(format!("invalid catalog URL: {}", e)))?
            .with_timeout(config.catalog_timeout);

        let assessment = AssessmentClient::new(config.assessment, http_client.clone())?;

        let store = StoreClient::new(&config.supabase_url, &config.supabase_key, http_client)?
            .with_timeout(config.store_timeout);

        Ok(Self {
            catalog,
            assessment,
            store,
        })
    }

    /// Convenience function to create a client directly from environment
    /// variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(CheckitConfig::from_env()?)
    }

    /// Analyze a scanned barcode end to end.
    ///
    /// A barcode the catalog does not know (or a catalog outage) is not an
    /// error: the assessment proceeds with the sentinel record and the model
    /// is instructed not to guess what is missing.
    pub async fn analyze_by_barcode(&self, barcode: &str) -> Result<ProductAssessment, Error> {
        let product = self.catalog.lookup(barcode).await;
        debug!(%barcode, name = %product.name, "assessing product");
        Ok(self.assessment.assess(&product).await?)
    }

    /// Analyze a manually entered product name with no catalog data.
    pub async fn analyze_by_name(&self, name: &str) -> Result<ProductAssessment, Error> {
        let product = RawProductInfo::from_name(name);
        Ok(self.assessment.assess(&product).await?)
    }

    /// Get a reference to the catalog lookup client.
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Get a reference to the assessment engine.
    pub fn assessment(&self) -> &AssessmentClient {
        &self.assessment
    }

    /// Get a reference to the persistence client.
    pub fn store(&self) -> &StoreClient {
        &self.store
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::CheckitConfig;
    pub use crate::error::Error;
    pub use crate::Checkit;
    pub use checkit_assessment::{ProductAssessment, Severity};
}
