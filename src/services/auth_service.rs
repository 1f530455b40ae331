//! Domain service for authentication and user administration.

use thiserror::Error;

use crate::api::types::{LoginDto, UserDto};
use crate::domain::Caller;
use crate::domain::access::InsufficientPermissions;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists.")]
    UserExists,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Forbidden(#[from] InsufficientPermissions),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginDto, AuthError>;

    /// Resolves a bearer token to the caller it was issued for.
    async fn authenticate(&self, token: &str) -> Result<Caller, AuthError>;

    async fn me(&self, caller: Caller) -> Result<UserDto, AuthError>;

    /// Registers a reviewer account. Admin only.
    async fn create_reviewer(
        &self,
        email: &str,
        password: &str,
        caller: Caller,
    ) -> Result<UserDto, AuthError>;

    /// Sets a new password for any user. Admin only.
    async fn change_password(
        &self,
        user_id: i32,
        new_password: &str,
        caller: Caller,
    ) -> Result<(), AuthError>;
}
