//! `SeaORM` implementation of the `QuestionService` trait.

use async_trait::async_trait;

use crate::api::types::{QuestionDetailDto, QuestionDto};
use crate::db::{QuestionFilter, Store};
use crate::domain::{Caller, Pagination, QuestionType};
use crate::entities::questions;
use crate::services::question_service::{
    NewQuestion, QuestionError, QuestionService, QuestionUpdate,
};

const EMPTY_OPTIONS: &str = "Options must be a non-empty array for multiple choice questions.";

pub struct SeaOrmQuestionService {
    store: Store,
}

impl SeaOrmQuestionService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads a question and applies the freeze and ownership guards shared by
    /// update and delete, in that order.
    async fn load_mutable(
        &self,
        id: i32,
        caller: Caller,
        verb: &str,
    ) -> Result<questions::Model, QuestionError> {
        let repo = self.store.questions();
        let question = repo.get(id).await?.ok_or(QuestionError::NotFound(id))?;

        if !repo.linked_form_ids(id).await?.is_empty() {
            return Err(QuestionError::Conflict(format!(
                "Cannot {verb} a question that is linked to a form"
            )));
        }

        if !caller.is_admin() && repo.answer_count(id).await? > 0 {
            return Err(QuestionError::Conflict(format!(
                "Cannot {verb} a question that has answers"
            )));
        }

        if !caller.can_modify(question.created_by_id) {
            return Err(QuestionError::Forbidden);
        }

        Ok(question)
    }
}

#[async_trait]
impl QuestionService for SeaOrmQuestionService {
    async fn create_question(
        &self,
        input: NewQuestion,
        caller: Caller,
    ) -> Result<QuestionDto, QuestionError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(QuestionError::Validation(
                "Text and type are required.".to_string(),
            ));
        }

        let question_type = input
            .question_type
            .parse::<QuestionType>()
            .map_err(|e| QuestionError::Validation(e.to_string()))?;

        let options = if question_type.takes_options() {
            match input.options {
                Some(options) if !options.is_empty() => Some(options),
                _ => return Err(QuestionError::Validation(EMPTY_OPTIONS.to_string())),
            }
        } else {
            None
        };

        let question = self
            .store
            .questions()
            .create(text, question_type, options, caller.user_id)
            .await?;

        tracing::info!(
            question_id = question.id,
            question_type = %question_type,
            user_id = caller.user_id,
            "Question created"
        );

        Ok(QuestionDto::from(question))
    }

    async fn update_question(
        &self,
        id: i32,
        update: QuestionUpdate,
        caller: Caller,
    ) -> Result<QuestionDto, QuestionError> {
        let question = self.load_mutable(id, caller, "update").await?;

        let text = match update.text {
            Some(text) if text.trim().is_empty() => {
                return Err(QuestionError::Validation(
                    "Question text cannot be empty.".to_string(),
                ));
            }
            Some(text) => Some(text.trim().to_string()),
            None => None,
        };

        let options = if question.question_type.takes_options() {
            match update.options {
                Some(options) if options.is_empty() => {
                    return Err(QuestionError::Validation(EMPTY_OPTIONS.to_string()));
                }
                Some(options) => Some(options),
                None => question.option_labels(),
            }
        } else {
            None
        };

        let updated = self.store.questions().update(question, text, options).await?;

        tracing::info!(question_id = id, user_id = caller.user_id, "Question updated");

        Ok(QuestionDto::from(updated))
    }

    async fn delete_question(&self, id: i32, caller: Caller) -> Result<(), QuestionError> {
        self.load_mutable(id, caller, "delete").await?;
        self.store.questions().delete(id).await?;

        tracing::info!(question_id = id, user_id = caller.user_id, "Question deleted");
        Ok(())
    }

    async fn get_question(&self, id: i32) -> Result<QuestionDetailDto, QuestionError> {
        let repo = self.store.questions();
        let (question, creator) = repo
            .get_with_creator(id)
            .await?
            .ok_or(QuestionError::NotFound(id))?;

        let form_ids = repo.linked_form_ids(id).await?;
        let answer_count = repo.answer_count(id).await?;

        Ok(QuestionDetailDto {
            question: QuestionDto::new(question, creator),
            form_ids,
            answer_count,
        })
    }

    async fn list_questions(
        &self,
        filter: QuestionFilter,
        page: Pagination,
    ) -> Result<Vec<QuestionDto>, QuestionError> {
        let rows = self.store.questions().list(&filter, page).await?;

        Ok(rows
            .into_iter()
            .map(|(question, creator)| QuestionDto::new(question, creator))
            .collect())
    }
}
