use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod feedback;
mod feedback_requests;
mod forms;
mod observability;
mod questions;
mod system;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AuthService, FeedbackService, FormService, QuestionService, RequestService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn question_service(&self) -> &Arc<dyn QuestionService> {
        &self.shared.question_service
    }

    #[must_use]
    pub fn form_service(&self) -> &Arc<dyn FormService> {
        &self.shared.form_service
    }

    #[must_use]
    pub fn request_service(&self) -> &Arc<dyn RequestService> {
        &self.shared.request_service
    }

    #[must_use]
    pub fn feedback_service(&self) -> &Arc<dyn FeedbackService> {
        &self.shared.feedback_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route(
            "/feedback-requests/token/{token}",
            get(feedback_requests::get_by_token),
        )
        .route("/feedback/token/{token}", post(feedback::submit_feedback))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/reviewers", post(auth::create_reviewer))
        .route("/reviewers/{id}/password", put(auth::change_password))
        .route(
            "/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/questions/{id}",
            get(questions::get_question)
                .patch(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/forms", get(forms::list_forms).post(forms::create_form))
        .route("/forms/{id}", get(forms::get_form).patch(forms::update_form))
        .route(
            "/forms/{form_id}/questions/{question_id}",
            post(forms::attach_question).delete(forms::detach_question),
        )
        .route(
            "/feedback-requests",
            get(feedback_requests::list_requests).post(feedback_requests::issue_request),
        )
        .route(
            "/feedback-requests/{id}",
            delete(feedback_requests::delete_request),
        )
        .route(
            "/feedback/{id}",
            get(feedback::get_feedback).delete(feedback::delete_feedback),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
