use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::super::classifier::InvestmentClassifier;
use super::super::domain::ListingAttributes;
use super::service::{ScoringOutcome, ScoringService};
use crate::workflows::listings::ListingSource;

/// Shared state behind the scoring endpoints.
pub struct ScoringState<C: ?Sized> {
    pub service: Arc<ScoringService<C>>,
    pub source: Option<Arc<dyn ListingSource>>,
}

impl<C: ?Sized> Clone for ScoringState<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            source: self.source.clone(),
        }
    }
}

/// Either explicit attributes or a listing URL to look up first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub listing: Option<ListingAttributes>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Router builder exposing the listing scoring endpoint.
pub fn scoring_router<C>(
    service: Arc<ScoringService<C>>,
    source: Option<Arc<dyn ListingSource>>,
) -> Router
where
    C: InvestmentClassifier + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/listings/score", post(score_handler::<C>))
        .with_state(ScoringState { service, source })
}

pub(crate) async fn score_handler<C>(
    State(state): State<ScoringState<C>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    C: InvestmentClassifier + ?Sized + 'static,
{
    let listing = match request.url {
        Some(url) => {
            let Some(source) = state.source.as_ref() else {
                let payload = json!({
                    "error": "listing retrieval is not configured",
                });
                return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response();
            };
            match source.fetch(&url).await {
                Ok(listing) => listing,
                Err(err) => {
                    let payload = json!({
                        "error": err.to_string(),
                    });
                    return (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response();
                }
            }
        }
        None => request.listing,
    };

    match state.service.score(listing) {
        Ok(ScoringOutcome::Reported(report)) => {
            let payload = json!({
                "status": "reported",
                "report": report,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(ScoringOutcome::NoData) => {
            let payload = json!({
                "status": "unavailable",
                "detail": "could not retrieve property info",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) if err.is_fatal() => {
            error!(error = %err, "classifier rejected a scoring request");
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
