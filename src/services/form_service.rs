//! Domain service for form composition.
//!
//! A form is an ordered list of links to catalog questions. Link positions
//! are dense and zero based; attach and detach keep them that way.

use thiserror::Error;

use crate::api::types::{FormDto, FormQuestionDto};
use crate::db::FormFilter;
use crate::domain::{Caller, Pagination};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form not found")]
    NotFound(i32),

    #[error("Question not found")]
    QuestionNotFound(i32),

    #[error("Question already linked to this form")]
    AlreadyLinked,

    #[error("{0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for FormError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FormError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait FormService: Send + Sync {
    async fn create_form(&self, title: &str, caller: Caller) -> Result<FormDto, FormError>;

    async fn update_form_title(
        &self,
        id: i32,
        title: &str,
        caller: Caller,
    ) -> Result<FormDto, FormError>;

    /// Links a question into a form at `order` (head of the form when
    /// omitted), shifting later links down.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadyLinked`] if the pair is already linked and
    /// [`FormError::Validation`] for a negative order.
    async fn attach_question(
        &self,
        form_id: i32,
        question_id: i32,
        order: Option<i32>,
        caller: Caller,
    ) -> Result<FormQuestionDto, FormError>;

    /// Unlinks a question and closes the gap. Unlinking a pair that is not
    /// linked succeeds without changes.
    async fn detach_question(
        &self,
        form_id: i32,
        question_id: i32,
        caller: Caller,
    ) -> Result<(), FormError>;

    async fn get_form(&self, id: i32) -> Result<FormDto, FormError>;

    async fn list_forms(
        &self,
        filter: FormFilter,
        page: Pagination,
    ) -> Result<Vec<FormDto>, FormError>;
}
