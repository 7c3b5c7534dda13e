use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type, authorization";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Cross-origin settings applied by [`cors`].
#[derive(Debug, Clone)]
pub(crate) struct CorsPolicy {
    origin: HeaderValue,
}

impl CorsPolicy {
    /// `None` when no origin is configured or the value cannot be sent as a header.
    pub(crate) fn from_origin(origin: Option<&str>) -> Option<Self> {
        let origin = origin?;
        match HeaderValue::from_str(origin) {
            Ok(origin) => Some(Self { origin }),
            Err(_) => {
                warn!(origin, "ignoring APP_CORS_ORIGIN that is not a valid header value");
                None
            }
        }
    }
}

pub(crate) async fn cors(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, policy.origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, policy.origin);
    response
}
