use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::domain::{QuestionType, RequestStatus, Role};
use crate::entities::{answers, feedback_requests, feedbacks, form_questions, forms, questions, users};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub created_by_id: i32,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserDto>,
}

impl QuestionDto {
    #[must_use]
    pub fn new(question: questions::Model, creator: Option<users::Model>) -> Self {
        Self {
            options: question.option_labels(),
            id: question.id,
            text: question.text,
            question_type: question.question_type,
            created_by_id: question.created_by_id,
            created_at: question.created_at,
            created_by: creator.map(UserDto::from),
        }
    }
}

impl From<questions::Model> for QuestionDto {
    fn from(question: questions::Model) -> Self {
        Self::new(question, None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetailDto {
    #[serde(flatten)]
    pub question: QuestionDto,
    pub form_ids: Vec<i32>,
    pub answer_count: u64,
}

/// A question as placed in a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormQuestionDto {
    pub id: i32,
    pub form_id: i32,
    pub question_id: i32,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDto>,
}

impl FormQuestionDto {
    #[must_use]
    pub fn new(link: form_questions::Model, question: Option<questions::Model>) -> Self {
        Self {
            id: link.id,
            form_id: link.form_id,
            question_id: link.question_id,
            order: link.position,
            question: question.map(QuestionDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDto {
    pub id: i32,
    pub title: String,
    pub created_by_id: i32,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserDto>,
    pub questions: Vec<FormQuestionDto>,
}

impl FormDto {
    #[must_use]
    pub fn new(
        form: forms::Model,
        creator: Option<users::Model>,
        questions: Vec<FormQuestionDto>,
    ) -> Self {
        Self {
            id: form.id,
            title: form.title,
            created_by_id: form.created_by_id,
            created_at: form.created_at,
            created_by: creator.map(UserDto::from),
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummaryDto {
    pub id: i32,
    pub title: String,
}

impl From<forms::Model> for FormSummaryDto {
    fn from(form: forms::Model) -> Self {
        Self {
            id: form.id,
            title: form.title,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedRequestDto {
    pub id: i32,
    pub token: String,
}

/// What a candidate sees when opening their link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRequestDto {
    pub id: i32,
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub form: PublicFormDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFormDto {
    pub id: i32,
    pub title: String,
    pub questions: Vec<PublicQuestionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestionDto {
    pub id: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
}

impl From<questions::Model> for PublicQuestionDto {
    fn from(question: questions::Model) -> Self {
        Self {
            options: question.option_labels(),
            id: question.id,
            text: question.text,
            question_type: question.question_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: i32,
    pub feedback_id: i32,
    pub question_id: i32,
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub selected: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDto>,
}

impl AnswerDto {
    #[must_use]
    pub fn new(answer: answers::Model, question: Option<questions::Model>) -> Self {
        Self {
            selected: answer
                .selected
                .and_then(|v| serde_json::from_value(v).ok()),
            id: answer.id,
            feedback_id: answer.feedback_id,
            question_id: answer.question_id,
            text: answer.text,
            rating: answer.rating,
            question: question.map(QuestionDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDto {
    pub id: i32,
    pub feedback_request_id: i32,
    pub created_at: String,
    pub answers: Vec<AnswerDto>,
}

impl FeedbackDto {
    #[must_use]
    pub fn new(feedback: feedbacks::Model, answers: Vec<AnswerDto>) -> Self {
        Self {
            id: feedback.id,
            feedback_request_id: feedback.feedback_request_id,
            created_at: feedback.created_at,
            answers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequestDto {
    pub id: i32,
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub form_id: i32,
    pub reviewer_id: i32,
    pub token: String,
    pub status: RequestStatus,
    pub created_at: String,
    pub form: Option<FormSummaryDto>,
    pub reviewer: Option<UserDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackDto>,
}

impl FeedbackRequestDto {
    #[must_use]
    pub fn new(
        request: feedback_requests::Model,
        form: Option<forms::Model>,
        reviewer: Option<UserDto>,
        feedback: Option<FeedbackDto>,
    ) -> Self {
        Self {
            id: request.id,
            candidate_email: request.candidate_email,
            candidate_name: request.candidate_name,
            form_id: request.form_id,
            reviewer_id: request.reviewer_id,
            token: request.token,
            status: request.status,
            created_at: request.created_at,
            form: form.map(FormSummaryDto::from),
            reviewer,
            feedback,
        }
    }
}

/// A feedback record with the request it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetailDto {
    pub id: i32,
    pub created_at: String,
    pub feedback_request: FeedbackRequestDto,
    pub answers: Vec<AnswerDto>,
}
