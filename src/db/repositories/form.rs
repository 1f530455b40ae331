use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::search;
use crate::domain::Pagination;
use crate::entities::{form_questions, forms, questions, users};

#[derive(Debug, Clone, Default)]
pub struct FormFilter {
    pub created_by_id: Option<i32>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
}

pub struct FormRepository {
    conn: DatabaseConnection,
}

impl FormRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, title: &str, created_by_id: i32) -> Result<forms::Model> {
        let active = forms::ActiveModel {
            title: Set(title.to_string()),
            title_folded: Set(search::fold(title)),
            created_by_id: Set(created_by_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert form")
    }

    pub async fn get(&self, id: i32) -> Result<Option<forms::Model>> {
        forms::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query form")
    }

    pub async fn get_with_creator(
        &self,
        id: i32,
    ) -> Result<Option<(forms::Model, Option<users::Model>)>> {
        forms::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query form with creator")
    }

    pub async fn update_title(&self, model: forms::Model, title: &str) -> Result<forms::Model> {
        let mut active: forms::ActiveModel = model.into();
        active.title = Set(title.to_string());
        active.title_folded = Set(search::fold(title));

        active
            .update(&self.conn)
            .await
            .context("Failed to update form title")
    }

    pub async fn link_count(&self, form_id: i32) -> Result<u64> {
        count_links(&self.conn, form_id).await
    }

    /// Links of the given forms joined with their questions, ordered by form
    /// and then by position.
    pub async fn links_with_questions(
        &self,
        form_ids: &[i32],
    ) -> Result<Vec<(form_questions::Model, questions::Model)>> {
        if form_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = form_questions::Entity::find()
            .find_also_related(questions::Entity)
            .filter(form_questions::Column::FormId.is_in(form_ids.iter().copied()))
            .order_by_asc(form_questions::Column::FormId)
            .order_by_asc(form_questions::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to query form questions")?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, question)| question.map(|q| (link, q)))
            .collect())
    }

    /// Insert a link at `requested` (default 0), shifting every link at or
    /// after that position down by one. Positions past the tail are clamped
    /// to the tail. Returns `None` when the pair is already linked.
    pub async fn attach_question(
        &self,
        form_id: i32,
        question_id: i32,
        requested: Option<i32>,
    ) -> Result<Option<form_questions::Model>> {
        let txn = self.conn.begin().await?;

        let existing = form_questions::Entity::find()
            .filter(form_questions::Column::FormId.eq(form_id))
            .filter(form_questions::Column::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .context("Failed to query existing form link")?;

        if existing.is_some() {
            return Ok(None);
        }

        let tail = i32::try_from(count_links(&txn, form_id).await?)
            .context("Form has too many questions")?;
        let position = requested.unwrap_or(0).clamp(0, tail);

        form_questions::Entity::update_many()
            .col_expr(
                form_questions::Column::Position,
                Expr::col(form_questions::Column::Position).add(1),
            )
            .filter(form_questions::Column::FormId.eq(form_id))
            .filter(form_questions::Column::Position.gte(position))
            .exec(&txn)
            .await
            .context("Failed to shift form question positions")?;

        let link = form_questions::ActiveModel {
            form_id: Set(form_id),
            question_id: Set(question_id),
            position: Set(position),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert form link")?;

        txn.commit().await?;
        Ok(Some(link))
    }

    /// Remove a link and close the gap it leaves. Returns `false` when the
    /// pair was not linked.
    pub async fn detach_question(&self, form_id: i32, question_id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let Some(link) = form_questions::Entity::find()
            .filter(form_questions::Column::FormId.eq(form_id))
            .filter(form_questions::Column::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .context("Failed to query form link")?
        else {
            return Ok(false);
        };

        form_questions::Entity::delete_by_id(link.id)
            .exec(&txn)
            .await
            .context("Failed to delete form link")?;

        form_questions::Entity::update_many()
            .col_expr(
                form_questions::Column::Position,
                Expr::col(form_questions::Column::Position).sub(1),
            )
            .filter(form_questions::Column::FormId.eq(form_id))
            .filter(form_questions::Column::Position.gt(link.position))
            .exec(&txn)
            .await
            .context("Failed to close form question gap")?;

        txn.commit().await?;
        Ok(true)
    }

    pub async fn list(
        &self,
        filter: &FormFilter,
        page: Pagination,
    ) -> Result<Vec<(forms::Model, Option<users::Model>)>> {
        let mut query = forms::Entity::find().find_also_related(users::Entity);

        if let Some(owner) = filter.created_by_id {
            query = query.filter(forms::Column::CreatedById.eq(owner));
        }

        if let Some(title) = filter.title.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Expr::col((forms::Entity, forms::Column::TitleFolded))
                    .like(search::contains(title)),
            );
        }

        query
            .order_by_desc(forms::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .context("Failed to list forms")
    }
}

async fn count_links<C: ConnectionTrait>(conn: &C, form_id: i32) -> Result<u64> {
    form_questions::Entity::find()
        .filter(form_questions::Column::FormId.eq(form_id))
        .count(conn)
        .await
        .context("Failed to count form questions")
}
