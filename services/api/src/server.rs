use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog_csv, load_profiles_json, AppState, InMemoryCatalog, InMemoryProfileStore,
};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use scholar_match::config::AppConfig;
use scholar_match::error::AppError;
use scholar_match::recommendations::{RecommendationError, RecommendationService, ScoringConfig};
use scholar_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let settings = &config.recommendations;
    let profiles = match &settings.profiles_json {
        Some(path) => load_profiles_json(path)?,
        None => {
            warn!("APP_PROFILES_JSON not set; serving with an empty profile store");
            InMemoryProfileStore::default()
        }
    };
    let catalog = match &settings.catalog_csv {
        Some(path) => load_catalog_csv(path, Local::now().date_naive())?,
        None => {
            warn!("APP_CATALOG_CSV not set; serving with an empty catalog");
            InMemoryCatalog::default()
        }
    };

    let recommendation_service = Arc::new(
        RecommendationService::new(
            Arc::new(profiles),
            Arc::new(catalog),
            ScoringConfig::default(),
        )
        .with_default_limit(settings.default_limit)
        .map_err(RecommendationError::from)?,
    );

    let app = with_recommendation_routes(recommendation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scholarship recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
