use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::search;
use crate::domain::{Pagination, RequestStatus};
use crate::entities::{answers, feedback_requests, feedbacks, forms};

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub reviewer_id: Option<i32>,
    pub status: Option<RequestStatus>,
    pub form_id: Option<i32>,
    /// Exact match.
    pub candidate_email: Option<String>,
    /// Case-insensitive substring.
    pub candidate_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFeedbackRequest {
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub form_id: i32,
    pub reviewer_id: i32,
    pub token: String,
}

pub struct FeedbackRequestRepository {
    conn: DatabaseConnection,
}

impl FeedbackRequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, request: NewFeedbackRequest) -> Result<feedback_requests::Model> {
        let active = feedback_requests::ActiveModel {
            candidate_email: Set(request.candidate_email),
            candidate_name_folded: Set(request.candidate_name.as_deref().map(search::fold)),
            candidate_name: Set(request.candidate_name),
            form_id: Set(request.form_id),
            reviewer_id: Set(request.reviewer_id),
            token: Set(request.token),
            status: Set(RequestStatus::Pending),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert feedback request")
    }

    pub async fn get(&self, id: i32) -> Result<Option<feedback_requests::Model>> {
        feedback_requests::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query feedback request")
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Option<feedback_requests::Model>> {
        feedback_requests::Entity::find()
            .filter(feedback_requests::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query feedback request by token")
    }

    /// Move a request from PENDING to EXPIRED. Returns `false` if it had
    /// already left PENDING.
    pub async fn mark_expired(&self, id: i32) -> Result<bool> {
        let result = feedback_requests::Entity::update_many()
            .col_expr(
                feedback_requests::Column::Status,
                Expr::value(RequestStatus::Expired),
            )
            .filter(feedback_requests::Column::Id.eq(id))
            .filter(feedback_requests::Column::Status.eq(RequestStatus::Pending))
            .exec(&self.conn)
            .await
            .context("Failed to expire feedback request")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(
        &self,
        filter: &RequestFilter,
        page: Pagination,
    ) -> Result<Vec<(feedback_requests::Model, Option<forms::Model>)>> {
        let mut query = feedback_requests::Entity::find().find_also_related(forms::Entity);

        if let Some(reviewer) = filter.reviewer_id {
            query = query.filter(feedback_requests::Column::ReviewerId.eq(reviewer));
        }

        if let Some(status) = filter.status {
            query = query.filter(feedback_requests::Column::Status.eq(status));
        }

        if let Some(form_id) = filter.form_id {
            query = query.filter(feedback_requests::Column::FormId.eq(form_id));
        }

        if let Some(email) = filter.candidate_email.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(feedback_requests::Column::CandidateEmail.eq(email));
        }

        if let Some(name) = filter.candidate_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Expr::col((
                    feedback_requests::Entity,
                    feedback_requests::Column::CandidateNameFolded,
                ))
                .like(search::contains(name)),
            );
        }

        query
            .order_by_desc(feedback_requests::Column::CreatedAt)
            .order_by_desc(feedback_requests::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .context("Failed to list feedback requests")
    }

    /// Delete a request along with its feedback and answers, whatever its
    /// status. Returns `false` if the request did not exist.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let feedback_ids: Vec<i32> = feedbacks::Entity::find()
            .select_only()
            .column(feedbacks::Column::Id)
            .filter(feedbacks::Column::FeedbackRequestId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .context("Failed to query feedback for request")?;

        if !feedback_ids.is_empty() {
            answers::Entity::delete_many()
                .filter(answers::Column::FeedbackId.is_in(feedback_ids.iter().copied()))
                .exec(&txn)
                .await
                .context("Failed to delete answers")?;

            feedbacks::Entity::delete_many()
                .filter(feedbacks::Column::FeedbackRequestId.eq(id))
                .exec(&txn)
                .await
                .context("Failed to delete feedback")?;
        }

        let result = feedback_requests::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete feedback request")?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
