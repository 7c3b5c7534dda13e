use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{Intake, Pathway};
use super::narrative::NarrativeGenerator;
use super::service::{TriageResponse, TriageService};

/// Router exposing case assessment and the indicator catalog.
pub fn triage_router<N>(service: Arc<TriageService<N>>) -> Router
where
    N: NarrativeGenerator + 'static,
{
    Router::new()
        .route("/api/v1/triage", post(assess_handler::<N>))
        .route("/api/v1/triage/rules", get(rules_handler::<N>))
        .with_state(service)
}

/// Always answers with an envelope-shaped body, even when the payload is unusable.
pub(crate) async fn assess_handler<N>(
    State(service): State<Arc<TriageService<N>>>,
    payload: Result<Json<Intake>, JsonRejection>,
) -> Response
where
    N: NarrativeGenerator + 'static,
{
    match payload {
        Ok(Json(intake)) => {
            let response = service.assess(&intake).await;
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(rejection) => {
            warn!(status = %rejection.status(), "triage payload rejected, returning fallback body");
            let response = TriageResponse::failed(rejection.body_text());
            (StatusCode::OK, Json(response)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RulesQuery {
    pub(crate) pathway: Option<String>,
}

pub(crate) async fn rules_handler<N>(
    State(service): State<Arc<TriageService<N>>>,
    Query(query): Query<RulesQuery>,
) -> Response
where
    N: NarrativeGenerator + 'static,
{
    let pathways = match query.pathway.as_deref() {
        Some(raw) => vec![Pathway::parse_or_default(raw)],
        None => Pathway::ALL.to_vec(),
    };

    let registry = service.engine().registry();
    let indicators: Vec<_> = pathways
        .into_iter()
        .flat_map(|pathway| registry.catalog(pathway))
        .collect();

    (StatusCode::OK, Json(json!({ "indicators": indicators }))).into_response()
}
