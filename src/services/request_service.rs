//! Domain service for the feedback request lifecycle.
//!
//! A request binds a candidate, a form and the issuing reviewer to a single
//! use token. It starts PENDING and ends SUBMITTED, or EXPIRED when an
//! expiry window is configured.

use thiserror::Error;

use crate::api::types::{FeedbackRequestDto, IssuedRequestDto, PublicRequestDto};
use crate::db::RequestFilter;
use crate::domain::{Caller, Pagination};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Feedback request not found")]
    NotFound(i32),

    #[error("Form not found")]
    FormNotFound(i32),

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("This feedback request has already been submitted.")]
    AlreadySubmitted,

    #[error("This feedback request has expired.")]
    Expired,

    #[error("{0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RequestError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub form_id: i32,
}

#[async_trait::async_trait]
pub trait RequestService: Send + Sync {
    /// Issues a request for a non-empty form and queues the invitation email.
    /// A failure to queue the email never fails the call.
    async fn issue_request(
        &self,
        input: IssueRequest,
        caller: Caller,
    ) -> Result<IssuedRequestDto, RequestError>;

    /// Resolves a candidate token to the form they should fill in.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::AlreadySubmitted`] or [`RequestError::Expired`]
    /// once the request has left PENDING.
    async fn get_by_token(&self, token: &str) -> Result<PublicRequestDto, RequestError>;

    async fn list_requests(
        &self,
        filter: RequestFilter,
        page: Pagination,
    ) -> Result<Vec<FeedbackRequestDto>, RequestError>;

    /// Deletes a request with its feedback and answers, whatever its status.
    async fn delete_request(&self, id: i32, caller: Caller) -> Result<(), RequestError>;
}
