use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    ValidJson, ValidPath, ValidQuery, non_blank, parse_optional_body, validate_pagination,
};
use super::{ApiError, ApiResponse, AppState, FormDto, FormQuestionDto};
use crate::db::FormFilter;
use crate::domain::Caller;
use crate::services::FormError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormTitleRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttachQuestionRequest {
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFormsQuery {
    pub created_by_id: Option<i32>,
    pub title: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::NotFound(_) | FormError::QuestionNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            FormError::AlreadyLinked => Self::Conflict(err.to_string()),
            FormError::Validation(msg) => Self::validation(msg),
            FormError::Forbidden => Self::forbidden(),
            FormError::Database(msg) => Self::DatabaseError(msg),
            FormError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /forms
pub async fn create_form(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidJson(payload): ValidJson<FormTitleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FormDto>>), ApiError> {
    let form = state.form_service().create_form(&payload.title, caller).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(form))))
}

/// GET /forms
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListFormsQuery>,
) -> Result<Json<ApiResponse<Vec<FormDto>>>, ApiError> {
    let page = validate_pagination(query.page, query.page_size)?;
    let filter = FormFilter {
        created_by_id: query.created_by_id,
        title: non_blank(query.title),
    };

    let forms = state.form_service().list_forms(filter, page).await?;
    Ok(Json(ApiResponse::success(forms)))
}

/// GET /forms/{id}
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ApiResponse<FormDto>>, ApiError> {
    let form = state.form_service().get_form(id).await?;
    Ok(Json(ApiResponse::success(form)))
}

/// PATCH /forms/{id}
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<FormTitleRequest>,
) -> Result<Json<ApiResponse<FormDto>>, ApiError> {
    let form = state
        .form_service()
        .update_form_title(id, &payload.title, caller)
        .await?;

    Ok(Json(ApiResponse::success(form)))
}

/// POST /forms/{formId}/questions/{questionId}
///
/// The body is optional; without it the question goes to the head.
pub async fn attach_question(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath((form_id, question_id)): ValidPath<(i32, i32)>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<FormQuestionDto>>), ApiError> {
    let payload: AttachQuestionRequest = parse_optional_body(&body)?;

    let link = state
        .form_service()
        .attach_question(form_id, question_id, payload.order, caller)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

/// DELETE /forms/{formId}/questions/{questionId}
pub async fn detach_question(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath((form_id, question_id)): ValidPath<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .form_service()
        .detach_question(form_id, question_id, caller)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
