use crate::cli::ServeArgs;
use crate::infra::{listing_source, load_scoring_service, AppState};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rentcheck::config::AppConfig;
use rentcheck::error::AppError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let scoring_service = load_scoring_service(&config.scoring, args.model.path.take())?;
    let source = listing_source(&config.retrieval)?;
    if source.is_none() {
        warn!("RENTCHECK_API_KEY unset; url lookups will be refused");
    }

    let app = with_scoring_routes(scoring_service, source)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rentcheck scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
