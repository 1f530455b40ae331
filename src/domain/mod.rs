//! Core domain vocabulary shared by the store, services and HTTP layer.

pub mod access;
pub mod pagination;

pub use access::Caller;
pub use pagination::Pagination;

use sea_orm::entity::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "REVIEWER")]
    Reviewer,
}

/// The three kinds of catalog question. Answer validation matches on this
/// exhaustively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[sea_orm(string_value = "TEXT")]
    Text,
    #[sea_orm(string_value = "RATING")]
    Rating,
    #[sea_orm(string_value = "MULTIPLE_CHOICE")]
    MultipleChoice,
}

impl QuestionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Rating => "RATING",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
        }
    }

    #[must_use]
    pub const fn takes_options(self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid question type.")]
pub struct InvalidQuestionType;

impl FromStr for QuestionType {
    type Err = InvalidQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(Self::Text),
            "RATING" => Ok(Self::Rating),
            "MULTIPLE_CHOICE" => Ok(Self::MultipleChoice),
            _ => Err(InvalidQuestionType),
        }
    }
}

/// Lifecycle of a feedback request. SUBMITTED and EXPIRED are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl RequestStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Loose address check: one `@`, no whitespace, a dot in the domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"))
        .is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("candidate@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("candidate"));
        assert!(!is_valid_email("candidate@example"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn question_type_parses_only_known_kinds() {
        assert_eq!("TEXT".parse(), Ok(QuestionType::Text));
        assert_eq!("RATING".parse(), Ok(QuestionType::Rating));
        assert_eq!("MULTIPLE_CHOICE".parse(), Ok(QuestionType::MultipleChoice));
        assert_eq!("text".parse::<QuestionType>(), Err(InvalidQuestionType));
        assert_eq!("CHECKBOX".parse::<QuestionType>(), Err(InvalidQuestionType));
    }

    #[test]
    fn enums_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"MULTIPLE_CHOICE\"");

        let status: RequestStatus = serde_json::from_str("\"SUBMITTED\"").unwrap();
        assert_eq!(status, RequestStatus::Submitted);
        assert!(status.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }
}
