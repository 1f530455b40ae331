use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::search;
use crate::domain::{Pagination, QuestionType};
use crate::entities::{answers, form_questions, questions, users};

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub created_by_id: Option<i32>,
    pub question_type: Option<QuestionType>,
    /// Case-insensitive substring of the question text.
    pub search: Option<String>,
}

pub struct QuestionRepository {
    conn: DatabaseConnection,
}

impl QuestionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        text: &str,
        question_type: QuestionType,
        options: Option<Vec<String>>,
        created_by_id: i32,
    ) -> Result<questions::Model> {
        let active = questions::ActiveModel {
            text: Set(text.to_string()),
            text_folded: Set(search::fold(text)),
            question_type: Set(question_type),
            options: Set(options.map(serde_json::Value::from)),
            created_by_id: Set(created_by_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert question")
    }

    pub async fn get(&self, id: i32) -> Result<Option<questions::Model>> {
        questions::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query question")
    }

    pub async fn get_with_creator(
        &self,
        id: i32,
    ) -> Result<Option<(questions::Model, Option<users::Model>)>> {
        questions::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query question with creator")
    }

    /// Ids of every form that links this question.
    pub async fn linked_form_ids(&self, id: i32) -> Result<Vec<i32>> {
        form_questions::Entity::find()
            .select_only()
            .column(form_questions::Column::FormId)
            .filter(form_questions::Column::QuestionId.eq(id))
            .order_by_asc(form_questions::Column::FormId)
            .into_tuple::<i32>()
            .all(&self.conn)
            .await
            .context("Failed to query forms linking question")
    }

    pub async fn answer_count(&self, id: i32) -> Result<u64> {
        answers::Entity::find()
            .filter(answers::Column::QuestionId.eq(id))
            .count(&self.conn)
            .await
            .context("Failed to count answers for question")
    }

    pub async fn update(
        &self,
        model: questions::Model,
        text: Option<String>,
        options: Option<Vec<String>>,
    ) -> Result<questions::Model> {
        let mut active: questions::ActiveModel = model.into();
        if let Some(text) = text {
            active.text_folded = Set(search::fold(&text));
            active.text = Set(text);
        }
        active.options = Set(options.map(serde_json::Value::from));

        active
            .update(&self.conn)
            .await
            .context("Failed to update question")
    }

    /// Delete a question together with every answer and link that
    /// references it.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        answers::Entity::delete_many()
            .filter(answers::Column::QuestionId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete answers for question")?;

        form_questions::Entity::delete_many()
            .filter(form_questions::Column::QuestionId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete form links for question")?;

        questions::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete question")?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn list(
        &self,
        filter: &QuestionFilter,
        page: Pagination,
    ) -> Result<Vec<(questions::Model, Option<users::Model>)>> {
        let mut query = questions::Entity::find().find_also_related(users::Entity);

        if let Some(owner) = filter.created_by_id {
            query = query.filter(questions::Column::CreatedById.eq(owner));
        }

        if let Some(kind) = filter.question_type {
            query = query.filter(questions::Column::QuestionType.eq(kind));
        }

        if let Some(term) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Expr::col((questions::Entity, questions::Column::TextFolded))
                    .like(search::contains(term)),
            );
        }

        query
            .order_by_desc(questions::Column::CreatedAt)
            .order_by_desc(questions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .context("Failed to list questions")
    }
}
