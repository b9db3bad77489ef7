use metrics_exporter_prometheus::PrometheusHandle;
use rentcheck::config::{ConfigError, RetrievalConfig, ScoringConfig};
use rentcheck::error::AppError;
use rentcheck::workflows::investment::{ForestModel, ScoringService};
use rentcheck::workflows::listings::{HasDataClient, ListingSource};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured model once and binds it to the feature schema.
pub(crate) fn load_scoring_service(
    config: &ScoringConfig,
    model_override: Option<PathBuf>,
) -> Result<Arc<ScoringService<ForestModel>>, AppError> {
    let path = model_override
        .or_else(|| config.model_path.clone())
        .ok_or(ConfigError::MissingModelPath)?;

    let model = ForestModel::from_path(&path)?;
    info!(
        path = %path.display(),
        trees = model.tree_count(),
        "classifier model loaded"
    );

    let schema = Arc::new(config.schema()?);
    let service = ScoringService::from_model(Arc::new(model), schema, config.assumptions)?;
    Ok(Arc::new(service))
}

/// URL lookups are only available when an API key is configured.
pub(crate) fn listing_source(
    config: &RetrievalConfig,
) -> Result<Option<Arc<dyn ListingSource>>, AppError> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Ok(None);
    };
    let client = HasDataClient::new(config.endpoint.clone(), api_key)?;
    Ok(Some(Arc::new(client)))
}
