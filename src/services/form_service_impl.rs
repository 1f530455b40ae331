//! `SeaORM` implementation of the `FormService` trait.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::api::types::{FormDto, FormQuestionDto};
use crate::db::{FormFilter, Store};
use crate::domain::{Caller, Pagination};
use crate::entities::forms;
use crate::services::form_service::{FormError, FormService};

pub struct SeaOrmFormService {
    store: Store,
}

impl SeaOrmFormService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn owned_form(&self, id: i32, caller: Caller) -> Result<forms::Model, FormError> {
        let form = self
            .store
            .forms()
            .get(id)
            .await?
            .ok_or(FormError::NotFound(id))?;

        if !caller.can_modify(form.created_by_id) {
            return Err(FormError::Forbidden);
        }

        Ok(form)
    }

    async fn ordered_questions(
        &self,
        form_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<FormQuestionDto>>, FormError> {
        let rows = self.store.forms().links_with_questions(form_ids).await?;

        let mut grouped: HashMap<i32, Vec<FormQuestionDto>> = HashMap::new();
        for (link, question) in rows {
            grouped
                .entry(link.form_id)
                .or_default()
                .push(FormQuestionDto::new(link, Some(question)));
        }

        Ok(grouped)
    }
}

fn require_title(title: &str) -> Result<&str, FormError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(FormError::Validation("Title is required.".to_string()));
    }
    Ok(title)
}

#[async_trait]
impl FormService for SeaOrmFormService {
    async fn create_form(&self, title: &str, caller: Caller) -> Result<FormDto, FormError> {
        let title = require_title(title)?;
        let form = self.store.forms().create(title, caller.user_id).await?;

        tracing::info!(form_id = form.id, user_id = caller.user_id, "Form created");

        Ok(FormDto::new(form, None, Vec::new()))
    }

    async fn update_form_title(
        &self,
        id: i32,
        title: &str,
        caller: Caller,
    ) -> Result<FormDto, FormError> {
        let title = require_title(title)?;
        let form = self.owned_form(id, caller).await?;
        let form = self.store.forms().update_title(form, title).await?;

        let mut questions = self.ordered_questions(&[id]).await?;
        Ok(FormDto::new(
            form,
            None,
            questions.remove(&id).unwrap_or_default(),
        ))
    }

    async fn attach_question(
        &self,
        form_id: i32,
        question_id: i32,
        order: Option<i32>,
        caller: Caller,
    ) -> Result<FormQuestionDto, FormError> {
        self.owned_form(form_id, caller).await?;

        let question = self
            .store
            .questions()
            .get(question_id)
            .await?
            .ok_or(FormError::QuestionNotFound(question_id))?;

        if order.is_some_and(|o| o < 0) {
            return Err(FormError::Validation(
                "Order must be a non-negative integer.".to_string(),
            ));
        }

        let link = self
            .store
            .forms()
            .attach_question(form_id, question_id, order)
            .await?
            .ok_or(FormError::AlreadyLinked)?;

        tracing::info!(
            form_id,
            question_id,
            order = link.position,
            user_id = caller.user_id,
            "Question attached to form"
        );

        Ok(FormQuestionDto::new(link, Some(question)))
    }

    async fn detach_question(
        &self,
        form_id: i32,
        question_id: i32,
        caller: Caller,
    ) -> Result<(), FormError> {
        self.owned_form(form_id, caller).await?;

        let removed = self
            .store
            .forms()
            .detach_question(form_id, question_id)
            .await?;

        if removed {
            tracing::info!(
                form_id,
                question_id,
                user_id = caller.user_id,
                "Question detached from form"
            );
        } else {
            tracing::debug!(form_id, question_id, "Detach skipped, question not linked");
        }

        Ok(())
    }

    async fn get_form(&self, id: i32) -> Result<FormDto, FormError> {
        let (form, creator) = self
            .store
            .forms()
            .get_with_creator(id)
            .await?
            .ok_or(FormError::NotFound(id))?;

        let mut questions = self.ordered_questions(&[id]).await?;
        Ok(FormDto::new(
            form,
            creator,
            questions.remove(&id).unwrap_or_default(),
        ))
    }

    async fn list_forms(
        &self,
        filter: FormFilter,
        page: Pagination,
    ) -> Result<Vec<FormDto>, FormError> {
        let rows = self.store.forms().list(&filter, page).await?;
        let ids: Vec<i32> = rows.iter().map(|(form, _)| form.id).collect();
        let mut questions = self.ordered_questions(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(form, creator)| {
                let links = questions.remove(&form.id).unwrap_or_default();
                FormDto::new(form, creator, links)
            })
            .collect())
    }
}
