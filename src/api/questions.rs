use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{ValidJson, ValidPath, ValidQuery, non_blank, validate_pagination};
use super::{ApiError, ApiResponse, AppState, QuestionDetailDto, QuestionDto};
use crate::db::QuestionFilter;
use crate::domain::{Caller, QuestionType};
use crate::services::{NewQuestion, QuestionError, QuestionUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateQuestionRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    pub created_by_id: Option<i32>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl From<QuestionError> for ApiError {
    fn from(err: QuestionError) -> Self {
        match err {
            QuestionError::NotFound(_) => Self::NotFound(err.to_string()),
            QuestionError::Validation(msg) => Self::validation(msg),
            QuestionError::Conflict(msg) => Self::Conflict(msg),
            QuestionError::Forbidden => Self::forbidden(),
            QuestionError::Database(msg) => Self::DatabaseError(msg),
            QuestionError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /questions
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidJson(payload): ValidJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionDto>>), ApiError> {
    let question = state
        .question_service()
        .create_question(
            NewQuestion {
                text: payload.text,
                question_type: payload.question_type,
                options: payload.options,
            },
            caller,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(question))))
}

/// GET /questions
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuestionsQuery>,
) -> Result<Json<ApiResponse<Vec<QuestionDto>>>, ApiError> {
    let page = validate_pagination(query.page, query.page_size)?;

    let question_type = non_blank(query.question_type)
        .map(|t| t.parse::<QuestionType>())
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let filter = QuestionFilter {
        created_by_id: query.created_by_id,
        question_type,
        search: non_blank(query.search),
    };

    let questions = state.question_service().list_questions(filter, page).await?;
    Ok(Json(ApiResponse::success(questions)))
}

/// GET /questions/{id}
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ApiResponse<QuestionDetailDto>>, ApiError> {
    let question = state.question_service().get_question(id).await?;
    Ok(Json(ApiResponse::success(question)))
}

/// PATCH /questions/{id}
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<UpdateQuestionRequest>,
) -> Result<Json<ApiResponse<QuestionDto>>, ApiError> {
    let question = state
        .question_service()
        .update_question(
            id,
            QuestionUpdate {
                text: payload.text,
                options: payload.options,
            },
            caller,
        )
        .await?;

    Ok(Json(ApiResponse::success(question)))
}

/// DELETE /questions/{id}
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(id): ValidPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.question_service().delete_question(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
