use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::RequestStatus;
use crate::entities::{answers, feedback_requests, feedbacks, questions};

/// A validated answer ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub question_id: i32,
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub selected: Option<Vec<String>>,
}

pub struct FeedbackRepository {
    conn: DatabaseConnection,
}

impl FeedbackRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<feedbacks::Model>> {
        feedbacks::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query feedback")
    }

    pub async fn get_for_request(&self, request_id: i32) -> Result<Option<feedbacks::Model>> {
        feedbacks::Entity::find()
            .filter(feedbacks::Column::FeedbackRequestId.eq(request_id))
            .one(&self.conn)
            .await
            .context("Failed to query feedback for request")
    }

    pub async fn for_requests(&self, request_ids: &[i32]) -> Result<Vec<feedbacks::Model>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }

        feedbacks::Entity::find()
            .filter(feedbacks::Column::FeedbackRequestId.is_in(request_ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query feedback for requests")
    }

    /// Answers of the given feedback in creation order, each with the
    /// question it answers.
    pub async fn answers_with_questions(
        &self,
        feedback_ids: &[i32],
    ) -> Result<Vec<(answers::Model, Option<questions::Model>)>> {
        if feedback_ids.is_empty() {
            return Ok(Vec::new());
        }

        answers::Entity::find()
            .find_also_related(questions::Entity)
            .filter(answers::Column::FeedbackId.is_in(feedback_ids.iter().copied()))
            .order_by_asc(answers::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query answers")
    }

    /// Record a submission: the feedback row, its answers and the request's
    /// move to SUBMITTED commit together or not at all. Returns `None` when
    /// the request already left PENDING or already has feedback.
    pub async fn submit(
        &self,
        request_id: i32,
        new_answers: Vec<NewAnswer>,
    ) -> Result<Option<(feedbacks::Model, Vec<answers::Model>)>> {
        let txn = self.conn.begin().await?;

        let flipped = feedback_requests::Entity::update_many()
            .col_expr(
                feedback_requests::Column::Status,
                Expr::value(RequestStatus::Submitted),
            )
            .filter(feedback_requests::Column::Id.eq(request_id))
            .filter(feedback_requests::Column::Status.eq(RequestStatus::Pending))
            .exec(&txn)
            .await
            .context("Failed to update feedback request status")?;

        if flipped.rows_affected == 0 {
            return Ok(None);
        }

        let existing = feedbacks::Entity::find()
            .filter(feedbacks::Column::FeedbackRequestId.eq(request_id))
            .one(&txn)
            .await
            .context("Failed to query existing feedback")?;

        if existing.is_some() {
            return Ok(None);
        }

        let feedback = feedbacks::ActiveModel {
            feedback_request_id: Set(request_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert feedback")?;

        let mut stored = Vec::with_capacity(new_answers.len());
        for answer in new_answers {
            let model = answers::ActiveModel {
                feedback_id: Set(feedback.id),
                question_id: Set(answer.question_id),
                text: Set(answer.text),
                rating: Set(answer.rating),
                selected: Set(answer.selected.map(serde_json::Value::from)),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert answer")?;
            stored.push(model);
        }

        txn.commit().await?;
        Ok(Some((feedback, stored)))
    }
}
