use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{ValidJson, ValidPath, ValidQuery, non_blank, validate_pagination};
use super::{
    ApiError, ApiResponse, AppState, FeedbackRequestDto, IssuedRequestDto, PublicRequestDto,
};
use crate::db::RequestFilter;
use crate::domain::{Caller, RequestStatus};
use crate::services::{IssueRequest, RequestError};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueRequestBody {
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub form_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListRequestsQuery {
    pub reviewer_id: Option<i32>,
    pub status: Option<RequestStatus>,
    pub form_id: Option<i32>,
    pub candidate_email: Option<String>,
    pub candidate_name: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotFound(_) | RequestError::FormNotFound(_) | RequestError::InvalidToken => {
                Self::NotFound(err.to_string())
            }
            RequestError::AlreadySubmitted | RequestError::Expired => {
                Self::Conflict(err.to_string())
            }
            RequestError::Validation(msg) => Self::validation(msg),
            RequestError::Forbidden => Self::forbidden(),
            RequestError::Database(msg) => Self::DatabaseError(msg),
            RequestError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /feedback-requests
pub async fn issue_request(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidJson(payload): ValidJson<IssueRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<IssuedRequestDto>>), ApiError> {
    let form_id = payload
        .form_id
        .ok_or_else(|| ApiError::validation("Candidate email and form ID are required."))?;

    let issued = state
        .request_service()
        .issue_request(
            IssueRequest {
                candidate_email: payload.candidate_email,
                candidate_name: payload.candidate_name,
                form_id,
            },
            caller,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(issued))))
}

/// GET /feedback-requests
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackRequestDto>>>, ApiError> {
    let page = validate_pagination(query.page, query.page_size)?;
    let filter = RequestFilter {
        reviewer_id: query.reviewer_id,
        status: query.status,
        form_id: query.form_id,
        candidate_email: non_blank(query.candidate_email),
        candidate_name: non_blank(query.candidate_name),
    };

    let requests = state.request_service().list_requests(filter, page).await?;
    Ok(Json(ApiResponse::success(requests)))
}

/// DELETE /feedback-requests/{id}
pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(id): ValidPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.request_service().delete_request(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /feedback-requests/token/{token}
///
/// Public: the token is the candidate's only credential.
pub async fn get_by_token(
    State(state): State<Arc<AppState>>,
    ValidPath(token): ValidPath<String>,
) -> Result<Json<ApiResponse<PublicRequestDto>>, ApiError> {
    let request = state.request_service().get_by_token(&token).await?;
    Ok(Json(ApiResponse::success(request)))
}
