//! Domain service for candidate submissions.

use thiserror::Error;

use crate::api::types::{FeedbackDetailDto, FeedbackDto};
use crate::domain::Caller;
use crate::services::answer_validation::AnswerInput;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Feedback not found")]
    NotFound(i32),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Feedback already submitted")]
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

impl From<sea_orm::DbErr> for FeedbackError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait FeedbackService: Send + Sync {
    /// Validates and records a submission for the request behind `token`.
    /// Either every answer is stored and the request becomes SUBMITTED, or
    /// nothing changes.
    async fn submit(
        &self,
        token: &str,
        answers: Vec<AnswerInput>,
    ) -> Result<FeedbackDto, FeedbackError>;

    async fn get_feedback(&self, id: i32) -> Result<FeedbackDetailDto, FeedbackError>;

    /// Deletes the feedback by deleting its parent request.
    async fn delete_feedback(&self, id: i32, caller: Caller) -> Result<(), FeedbackError>;
}
