//! Error handling for the checkit pipeline

use thiserror::Error;

use checkit_assessment::AssessmentError;
use checkit_store::StoreError;

/// Unified error type for the checkit client.
///
/// There is deliberately no catalog variant: lookup failures are absorbed
/// inside the catalog client and replaced by sentinel data, so they can
/// never reach a caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The assessment engine failed or returned an untrustworthy result.
    /// Callers should offer a retry of the whole pipeline.
    #[error("assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    /// A persistence call failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
