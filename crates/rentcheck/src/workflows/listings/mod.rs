//! Adapters that supply raw listing attributes to the scoring pipeline.

mod hasdata;
mod importer;

pub use hasdata::{parse_property_response, HasDataClient, DEFAULT_HASDATA_ENDPOINT};
pub use importer::{ListingCsvImporter, ListingImport, ListingImportError, RejectedRow};

use crate::workflows::investment::ListingAttributes;
use async_trait::async_trait;

/// Looks up a listing by its public URL.
///
/// `Ok(None)` means the lookup completed but produced no usable listing.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self, listing_url: &str) -> Result<Option<ListingAttributes>, RetrievalError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("listing lookup failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing lookup returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("listing url must not be empty")]
    EmptyUrl,
}

/// Parses listing-feed numbers such as `250000`, `"$1,250,000"` or `"3.0"`.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .replace([',', '$'], "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
