use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{ValidJson, ValidPath};
use super::{ApiError, ApiResponse, AppState, FeedbackDetailDto, FeedbackDto};
use crate::domain::Caller;
use crate::services::FeedbackError;
use crate::services::answer_validation::AnswerInput;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitFeedbackRequest {
    pub answers: Vec<AnswerInput>,
}

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::NotFound(_) | FeedbackError::InvalidToken => {
                Self::NotFound(err.to_string())
            }
            FeedbackError::AlreadySubmitted | FeedbackError::Expired => {
                Self::Conflict(err.to_string())
            }
            FeedbackError::Validation(msg) => Self::validation(msg),
            FeedbackError::Forbidden => Self::forbidden(),
            FeedbackError::Database(msg) => Self::DatabaseError(msg),
            FeedbackError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /feedback/token/{token}
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    ValidPath(token): ValidPath<String>,
    ValidJson(payload): ValidJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackDto>>), ApiError> {
    let feedback = state
        .feedback_service()
        .submit(&token, payload.answers)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(feedback))))
}

/// GET /feedback/{id}
pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ApiResponse<FeedbackDetailDto>>, ApiError> {
    let feedback = state.feedback_service().get_feedback(id).await?;
    Ok(Json(ApiResponse::success(feedback)))
}

/// DELETE /feedback/{id}
pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(id): ValidPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.feedback_service().delete_feedback(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
