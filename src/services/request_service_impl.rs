//! `SeaORM` implementation of the `RequestService` trait.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::api::types::{
    AnswerDto, FeedbackDto, FeedbackRequestDto, IssuedRequestDto, PublicFormDto,
    PublicQuestionDto, PublicRequestDto, UserDto,
};
use crate::db::{NewFeedbackRequest, RequestFilter, Store};
use crate::domain::{Caller, Pagination, RequestStatus, is_valid_email};
use crate::entities::{feedback_requests, forms};
use crate::notify::{FeedbackInvite, NotificationDispatcher};
use crate::services::credentials::generate_request_token;
use crate::services::request_service::{IssueRequest, RequestError, RequestService};

pub struct SeaOrmRequestService {
    store: Store,
    notifications: NotificationDispatcher,
    expiry: Option<chrono::Duration>,
}

impl SeaOrmRequestService {
    #[must_use]
    pub const fn new(
        store: Store,
        notifications: NotificationDispatcher,
        expiry: Option<chrono::Duration>,
    ) -> Self {
        Self {
            store,
            notifications,
            expiry,
        }
    }
}

/// Whether a request created at `created_at` has outlived `expiry`.
#[must_use]
pub fn is_past_expiry(
    created_at: &str,
    expiry: Option<chrono::Duration>,
    now: chrono::DateTime<chrono::Utc>,
) -> bool {
    let Some(expiry) = expiry else {
        return false;
    };

    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(created) => now >= created.with_timezone(&chrono::Utc) + expiry,
        Err(e) => {
            tracing::warn!(created_at, error = %e, "Unparseable request timestamp");
            false
        }
    }
}

/// The status a request has right now. A PENDING request past its expiry
/// is moved to EXPIRED before being reported.
pub async fn current_status(
    store: &Store,
    request: &feedback_requests::Model,
    expiry: Option<chrono::Duration>,
) -> anyhow::Result<RequestStatus> {
    if request.status != RequestStatus::Pending
        || !is_past_expiry(&request.created_at, expiry, chrono::Utc::now())
    {
        return Ok(request.status);
    }

    if store.requests().mark_expired(request.id).await? {
        tracing::info!(request_id = request.id, "Feedback request expired");
        return Ok(RequestStatus::Expired);
    }

    // Lost a race with a submission or another expiry; report what is stored.
    let stored = store.requests().get(request.id).await?;
    Ok(stored.map_or(RequestStatus::Expired, |r| r.status))
}

/// Builds request views with their form, reviewer and, when submitted, the
/// feedback and answers.
pub async fn hydrate_requests(
    store: &Store,
    rows: Vec<(feedback_requests::Model, Option<forms::Model>)>,
) -> anyhow::Result<Vec<FeedbackRequestDto>> {
    let mut reviewer_ids: Vec<i32> = rows.iter().map(|(r, _)| r.reviewer_id).collect();
    reviewer_ids.sort_unstable();
    reviewer_ids.dedup();

    let reviewers: HashMap<i32, UserDto> = store
        .users()
        .get_by_ids(&reviewer_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, UserDto::from(u)))
        .collect();

    let request_ids: Vec<i32> = rows.iter().map(|(r, _)| r.id).collect();
    let feedback = store.feedback().for_requests(&request_ids).await?;
    let feedback_ids: Vec<i32> = feedback.iter().map(|f| f.id).collect();

    let mut answers: HashMap<i32, Vec<AnswerDto>> = HashMap::new();
    for (answer, question) in store.feedback().answers_with_questions(&feedback_ids).await? {
        answers
            .entry(answer.feedback_id)
            .or_default()
            .push(AnswerDto::new(answer, question));
    }

    let mut by_request: HashMap<i32, FeedbackDto> = feedback
        .into_iter()
        .map(|f| {
            let list = answers.remove(&f.id).unwrap_or_default();
            (f.feedback_request_id, FeedbackDto::new(f, list))
        })
        .collect();

    Ok(rows
        .into_iter()
        .map(|(request, form)| {
            let reviewer = reviewers.get(&request.reviewer_id).cloned();
            let feedback = by_request.remove(&request.id);
            FeedbackRequestDto::new(request, form, reviewer, feedback)
        })
        .collect())
}

#[async_trait]
impl RequestService for SeaOrmRequestService {
    async fn issue_request(
        &self,
        input: IssueRequest,
        caller: Caller,
    ) -> Result<IssuedRequestDto, RequestError> {
        let candidate_email = input.candidate_email.trim().to_string();
        if candidate_email.is_empty() {
            return Err(RequestError::Validation(
                "Candidate email and form ID are required.".to_string(),
            ));
        }

        if !is_valid_email(&candidate_email) {
            return Err(RequestError::Validation(
                "Invalid candidate email address.".to_string(),
            ));
        }

        let form = self
            .store
            .forms()
            .get(input.form_id)
            .await?
            .ok_or(RequestError::FormNotFound(input.form_id))?;

        if self.store.forms().link_count(form.id).await? == 0 {
            return Err(RequestError::Validation(
                "Form must contain at least one question before it can be used".to_string(),
            ));
        }

        let candidate_name = input
            .candidate_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let request = self
            .store
            .requests()
            .create(NewFeedbackRequest {
                candidate_email,
                candidate_name,
                form_id: form.id,
                reviewer_id: caller.user_id,
                token: generate_request_token(),
            })
            .await?;

        metrics::counter!("feedback_requests_issued_total").increment(1);
        tracing::info!(
            request_id = request.id,
            form_id = form.id,
            reviewer_id = caller.user_id,
            "Feedback request issued"
        );

        self.notifications.dispatch(FeedbackInvite {
            candidate_email: request.candidate_email.clone(),
            candidate_name: request.candidate_name.clone(),
            token: request.token.clone(),
        });

        Ok(IssuedRequestDto {
            id: request.id,
            token: request.token,
        })
    }

    async fn get_by_token(&self, token: &str) -> Result<PublicRequestDto, RequestError> {
        let request = self
            .store
            .requests()
            .get_by_token(token)
            .await?
            .ok_or(RequestError::InvalidToken)?;

        match current_status(&self.store, &request, self.expiry).await? {
            RequestStatus::Pending => {}
            RequestStatus::Submitted => return Err(RequestError::AlreadySubmitted),
            RequestStatus::Expired => return Err(RequestError::Expired),
        }

        let form = self
            .store
            .forms()
            .get(request.form_id)
            .await?
            .ok_or(RequestError::FormNotFound(request.form_id))?;

        let questions = self
            .store
            .forms()
            .links_with_questions(&[form.id])
            .await?
            .into_iter()
            .map(|(_, question)| PublicQuestionDto::from(question))
            .collect();

        Ok(PublicRequestDto {
            id: request.id,
            candidate_email: request.candidate_email,
            candidate_name: request.candidate_name,
            form: PublicFormDto {
                id: form.id,
                title: form.title,
                questions,
            },
        })
    }

    async fn list_requests(
        &self,
        filter: RequestFilter,
        page: Pagination,
    ) -> Result<Vec<FeedbackRequestDto>, RequestError> {
        let rows = self.store.requests().list(&filter, page).await?;
        Ok(hydrate_requests(&self.store, rows).await?)
    }

    async fn delete_request(&self, id: i32, caller: Caller) -> Result<(), RequestError> {
        let request = self
            .store
            .requests()
            .get(id)
            .await?
            .ok_or(RequestError::NotFound(id))?;

        if !caller.can_modify(request.reviewer_id) {
            return Err(RequestError::Forbidden);
        }

        self.store.requests().delete(id).await?;

        tracing::info!(request_id = id, user_id = caller.user_id, "Feedback request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_disabled_never_expires() {
        let now = chrono::Utc::now();
        assert!(!is_past_expiry("2000-01-01T00:00:00+00:00", None, now));
    }

    #[test]
    fn expiry_compares_against_creation_time() {
        let created = chrono::Utc::now() - chrono::Duration::hours(5);
        let created = created.to_rfc3339();
        let now = chrono::Utc::now();

        assert!(is_past_expiry(&created, Some(chrono::Duration::hours(4)), now));
        assert!(!is_past_expiry(&created, Some(chrono::Duration::hours(6)), now));
        assert!(is_past_expiry(&created, Some(chrono::Duration::zero()), now));
    }

    #[test]
    fn garbage_timestamp_is_not_expired() {
        let now = chrono::Utc::now();
        assert!(!is_past_expiry("yesterday", Some(chrono::Duration::hours(1)), now));
    }
}
