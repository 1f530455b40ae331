//! `SeaORM` implementation of the `FeedbackService` trait.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::api::types::{AnswerDto, FeedbackDetailDto, FeedbackDto};
use crate::db::Store;
use crate::domain::{Caller, RequestStatus};
use crate::entities::questions;
use crate::services::answer_validation::{AnswerInput, validate_answers};
use crate::services::feedback_service::{FeedbackError, FeedbackService};
use crate::services::request_service_impl::{current_status, hydrate_requests};

pub struct SeaOrmFeedbackService {
    store: Store,
    expiry: Option<chrono::Duration>,
}

impl SeaOrmFeedbackService {
    #[must_use]
    pub const fn new(store: Store, expiry: Option<chrono::Duration>) -> Self {
        Self { store, expiry }
    }
}

#[async_trait]
impl FeedbackService for SeaOrmFeedbackService {
    async fn submit(
        &self,
        token: &str,
        answers: Vec<AnswerInput>,
    ) -> Result<FeedbackDto, FeedbackError> {
        let request = self
            .store
            .requests()
            .get_by_token(token)
            .await?
            .ok_or(FeedbackError::InvalidToken)?;

        match current_status(&self.store, &request, self.expiry).await? {
            RequestStatus::Pending => {}
            RequestStatus::Submitted => return Err(FeedbackError::AlreadySubmitted),
            RequestStatus::Expired => return Err(FeedbackError::Expired),
        }

        if self
            .store
            .feedback()
            .get_for_request(request.id)
            .await?
            .is_some()
        {
            return Err(FeedbackError::AlreadySubmitted);
        }

        let form_questions: Vec<questions::Model> = self
            .store
            .forms()
            .links_with_questions(&[request.form_id])
            .await?
            .into_iter()
            .map(|(_, question)| question)
            .collect();

        let validated =
            validate_answers(&form_questions, &answers).map_err(FeedbackError::Validation)?;

        let (feedback, stored) = self
            .store
            .feedback()
            .submit(request.id, validated)
            .await?
            .ok_or(FeedbackError::AlreadySubmitted)?;

        metrics::counter!("feedback_submissions_total").increment(1);
        tracing::info!(
            request_id = request.id,
            feedback_id = feedback.id,
            answers = stored.len(),
            "Feedback submitted"
        );

        let by_id: HashMap<i32, questions::Model> =
            form_questions.into_iter().map(|q| (q.id, q)).collect();
        let answers = stored
            .into_iter()
            .map(|answer| {
                let question = by_id.get(&answer.question_id).cloned();
                AnswerDto::new(answer, question)
            })
            .collect();

        Ok(FeedbackDto::new(feedback, answers))
    }

    async fn get_feedback(&self, id: i32) -> Result<FeedbackDetailDto, FeedbackError> {
        let feedback = self
            .store
            .feedback()
            .get(id)
            .await?
            .ok_or(FeedbackError::NotFound(id))?;

        let request = self
            .store
            .requests()
            .get(feedback.feedback_request_id)
            .await?
            .ok_or_else(|| {
                FeedbackError::Internal(format!("Feedback {id} has no parent request"))
            })?;

        let form = self.store.forms().get(request.form_id).await?;

        let mut feedback_request = hydrate_requests(&self.store, vec![(request, form)])
            .await?
            .pop()
            .ok_or_else(|| FeedbackError::Internal("Request hydration returned nothing".into()))?;

        let answers = feedback_request
            .feedback
            .take()
            .map(|f| f.answers)
            .unwrap_or_default();

        Ok(FeedbackDetailDto {
            id: feedback.id,
            created_at: feedback.created_at,
            feedback_request,
            answers,
        })
    }

    async fn delete_feedback(&self, id: i32, caller: Caller) -> Result<(), FeedbackError> {
        let feedback = self
            .store
            .feedback()
            .get(id)
            .await?
            .ok_or(FeedbackError::NotFound(id))?;

        let request = self
            .store
            .requests()
            .get(feedback.feedback_request_id)
            .await?
            .ok_or(FeedbackError::NotFound(id))?;

        if !caller.can_modify(request.reviewer_id) {
            return Err(FeedbackError::Forbidden);
        }

        self.store.requests().delete(request.id).await?;

        tracing::info!(
            feedback_id = id,
            request_id = request.id,
            user_id = caller.user_id,
            "Feedback deleted"
        );
        Ok(())
    }
}
