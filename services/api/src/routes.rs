use crate::infra::{cors, AppState, CorsPolicy};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use triage_advisor::referral::{triage_router, NarrativeGenerator, TriageService};

pub(crate) fn with_triage_routes<N>(service: Arc<TriageService<N>>, body_limit: usize) -> Router
where
    N: NarrativeGenerator + 'static,
{
    triage_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Wrap the whole app so preflight requests never reach the routes.
pub(crate) fn with_cors(router: Router, policy: Option<CorsPolicy>) -> Router {
    match policy {
        Some(policy) => router.layer(middleware::from_fn_with_state(policy, cors)),
        None => router,
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
