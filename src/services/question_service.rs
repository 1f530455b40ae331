//! Domain service for the question catalog.
//!
//! Questions are reusable across forms and become frozen once a form links
//! them or a candidate has answered them.

use thiserror::Error;

use crate::api::types::{QuestionDetailDto, QuestionDto};
use crate::db::QuestionFilter;
use crate::domain::{Caller, Pagination};

/// Errors specific to question operations.
#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("Question not found")]
    NotFound(i32),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for QuestionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for QuestionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for a new catalog question. The type arrives as the raw wire string
/// so unknown kinds are reported as validation failures.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub question_type: String,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub text: Option<String>,
    pub options: Option<Vec<String>>,
}

#[async_trait::async_trait]
pub trait QuestionService: Send + Sync {
    /// Creates a question owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::Validation`] for blank text, an unknown type,
    /// or a multiple choice question without options.
    async fn create_question(
        &self,
        input: NewQuestion,
        caller: Caller,
    ) -> Result<QuestionDto, QuestionError>;

    /// Overwrites text and options of an unfrozen question.
    async fn update_question(
        &self,
        id: i32,
        update: QuestionUpdate,
        caller: Caller,
    ) -> Result<QuestionDto, QuestionError>;

    /// Deletes an unlinked question together with its answers.
    async fn delete_question(&self, id: i32, caller: Caller) -> Result<(), QuestionError>;

    async fn get_question(&self, id: i32) -> Result<QuestionDetailDto, QuestionError>;

    /// Lists questions newest first.
    async fn list_questions(
        &self,
        filter: QuestionFilter,
        page: Pagination,
    ) -> Result<Vec<QuestionDto>, QuestionError>;
}
