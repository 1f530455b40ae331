use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::{ValidJson, ValidPath};
use super::{ApiError, ApiResponse, AppState, LoginDto, UserDto};
use crate::domain::Caller;
use crate::services::AuthError;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateReviewerRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                Self::unauthorized(err.to_string())
            }
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::UserExists => Self::Conflict(err.to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Forbidden(e) => Self::Forbidden(e.to_string()),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Bearer <token>` into a [`Caller`] extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        ApiError::unauthorized("Authorization header missing or malformed.")
    })?;

    let caller = state.auth_service().authenticate(token).await?;

    tracing::Span::current().record("user_id", caller.user_id);
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginDto>>, ApiError> {
    let login = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(login)))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth_service().me(caller).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /reviewers
pub async fn create_reviewer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidJson(payload): ValidJson<CreateReviewerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .auth_service()
        .create_reviewer(&payload.email, &payload.password, caller)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// PUT /reviewers/{id}/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    ValidPath(user_id): ValidPath<i32>,
    ValidJson(payload): ValidJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .change_password(user_id, &payload.new_password, caller)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated.".to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
