use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => handle.render().into_response(),
        None => "# metrics disabled\n".into_response(),
    }
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

/// Per-request span, request id header and HTTP metrics.
///
/// Installed as a route layer so the matched route template is known; the
/// raw path is never used as a label since candidate tokens live in it.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_owned(), |mp| mp.as_str().to_owned());

    let span = info_span!(
        "request",
        %request_id,
        method = %method,
        route = %route,
        user_id = tracing::field::Empty,
    );

    let in_flight = metrics::gauge!("http_requests_in_flight");
    in_flight.increment(1.0);

    let mut response = next.run(req).instrument(span.clone()).await;

    in_flight.decrement(1.0);

    let elapsed = start.elapsed();
    let status = response.status();

    let labels = [
        ("method", method),
        ("path", route),
        ("status", status.as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(elapsed.as_secs_f64());

    span.in_scope(|| {
        tracing::info!(
            status_code = status.as_u16(),
            outcome = status_class(status),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_are_bucketed() {
        assert_eq!(status_class(StatusCode::CREATED), "success");
        assert_eq!(status_class(StatusCode::NO_CONTENT), "success");
        assert_eq!(status_class(StatusCode::FORBIDDEN), "client_error");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "error");
    }
}
