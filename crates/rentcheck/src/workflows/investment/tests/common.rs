use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::investment::classifier::{ClassifierError, InvestmentClassifier};
use crate::workflows::investment::domain::ListingAttributes;
use crate::workflows::investment::features::FeatureSchema;
use crate::workflows::investment::financials::FinancialAssumptions;
use crate::workflows::investment::scoring::ScoringService;
use crate::workflows::listings::{ListingSource, RetrievalError};

/// Classifier double that records every row it is asked to label.
pub(super) struct RecordingClassifier {
    names: Vec<String>,
    label: u8,
    calls: AtomicUsize,
    last_row: std::sync::Mutex<Option<Vec<f64>>>,
}

impl RecordingClassifier {
    pub(super) fn new(schema: &FeatureSchema, label: u8) -> Self {
        Self {
            names: schema.columns().to_vec(),
            label,
            calls: AtomicUsize::new(0),
            last_row: std::sync::Mutex::new(None),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_row(&self) -> Option<Vec<f64>> {
        self.last_row.lock().expect("row mutex poisoned").clone()
    }
}

impl InvestmentClassifier for RecordingClassifier {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_row.lock().expect("row mutex poisoned") = Some(features.to_vec());
        Ok(self.label)
    }
}

pub(super) fn scenario_a_listing() -> ListingAttributes {
    ListingAttributes::new(300_000.0, 3, 2.0, "33304")
        .with_address("500 E Las Olas Blvd, Fort Lauderdale, FL 33304")
}

pub(super) fn scenario_b_listing() -> ListingAttributes {
    ListingAttributes::new(100_000.0, 2, 1.0, "99999")
}

pub(super) fn build_service(
    label: u8,
) -> (ScoringService<RecordingClassifier>, Arc<RecordingClassifier>) {
    build_service_with_schema(FeatureSchema::standard(), label)
}

pub(super) fn build_service_with_schema(
    schema: FeatureSchema,
    label: u8,
) -> (ScoringService<RecordingClassifier>, Arc<RecordingClassifier>) {
    let model = Arc::new(RecordingClassifier::new(&schema, label));
    let service = ScoringService::from_model(
        model.clone(),
        Arc::new(schema),
        FinancialAssumptions::default(),
    )
    .expect("schema matches");
    (service, model)
}

/// Listing source double keyed by URL.
pub(super) struct StubSource {
    pub(super) listing: Option<ListingAttributes>,
}

#[async_trait]
impl ListingSource for StubSource {
    async fn fetch(&self, listing_url: &str) -> Result<Option<ListingAttributes>, RetrievalError> {
        if listing_url.trim().is_empty() {
            return Err(RetrievalError::EmptyUrl);
        }
        Ok(self.listing.clone())
    }
}

pub(super) fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
