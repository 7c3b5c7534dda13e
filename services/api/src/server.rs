use crate::cli::ServeArgs;
use crate::infra::{AppState, CorsPolicy};
use crate::routes::{with_cors, with_triage_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use triage_advisor::config::AppConfig;
use triage_advisor::error::AppError;
use triage_advisor::referral::{NarrativeBackend, TriageEngine, TriageService};
use triage_advisor::telemetry;

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

    let narrative = NarrativeBackend::from_config(&config.narrative);
    let triage_service = Arc::new(TriageService::new(
        TriageEngine::default(),
        Arc::new(narrative),
        config.narrative.timeout(),
    ));

    let app = with_triage_routes(triage_service, config.server.body_limit_bytes)
        .layer(Extension(app_state))
        .layer(prometheus_layer);
    let app = with_cors(
        app,
        CorsPolicy::from_origin(config.server.cors_origin.as_deref()),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        narrative_enabled = config.narrative.enabled,
        "genetics triage advisor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
