//! Checks submitted answers against the questions of the bound form.
//!
//! Answers are checked in input order and the first violation is reported.
//! Unanswered questions are fine; partial submissions are accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::db::NewAnswer;
use crate::domain::QuestionType;
use crate::entities::questions;

/// One answer as submitted by a candidate. Field values are kept as raw JSON
/// so type mismatches surface as validation messages rather than body
/// rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: i32,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub selected: Option<Value>,
}

pub fn validate_answers(
    form_questions: &[questions::Model],
    answers: &[AnswerInput],
) -> Result<Vec<NewAnswer>, String> {
    answers
        .iter()
        .map(|answer| validate_answer(form_questions, answer))
        .collect()
}

fn validate_answer(
    form_questions: &[questions::Model],
    answer: &AnswerInput,
) -> Result<NewAnswer, String> {
    let id = answer.question_id;
    let question = form_questions
        .iter()
        .find(|q| q.id == id)
        .ok_or_else(|| format!("Question with ID {id} is not part of the form"))?;

    match question.question_type {
        QuestionType::Text => {
            if !answer.text.as_ref().is_some_and(Value::is_string) {
                return Err(format!("Answer to question with ID {id} must be a string"));
            }
        }
        QuestionType::Rating => {
            if !answer.rating.as_ref().is_some_and(Value::is_number) {
                return Err(format!("Answer to question with ID {id} must be a number"));
            }
        }
        QuestionType::MultipleChoice => {
            let selected = answer
                .selected
                .as_ref()
                .and_then(string_list)
                .ok_or_else(|| format!("Answer to question with ID {id} must be a list"))?;

            let options = question
                .option_labels()
                .filter(|o| !o.is_empty())
                .ok_or_else(|| format!("Question with ID {id} has no valid options defined"))?;

            if let Some(invalid) = selected.iter().find(|v| !options.contains(v)) {
                return Err(format!(
                    "Invalid option \"{invalid}\" for question with ID {id}"
                ));
            }
        }
    }

    Ok(NewAnswer {
        question_id: id,
        text: typed_field(answer.text.as_ref(), "text", id, |v| {
            v.as_str().map(ToString::to_string)
        })?,
        rating: typed_field(answer.rating.as_ref(), "rating", id, Value::as_f64)?,
        selected: typed_field(answer.selected.as_ref(), "selected", id, string_list)?,
    })
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(ToString::to_string))
        .collect()
}

/// Extra fields beyond the one the question type requires are stored when
/// they fit their column.
fn typed_field<T>(
    value: Option<&Value>,
    field: &str,
    id: i32,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<Option<T>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => convert(v).map(Some).ok_or_else(|| {
            format!("Field '{field}' on answer to question with ID {id} has the wrong type")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: i32, question_type: QuestionType, options: Option<Value>) -> questions::Model {
        questions::Model {
            id,
            text: format!("Question {id}"),
            text_folded: format!("question {id}"),
            question_type,
            options,
            created_by_id: 1,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn form() -> Vec<questions::Model> {
        vec![
            question(1, QuestionType::Text, None),
            question(2, QuestionType::Rating, None),
            question(
                3,
                QuestionType::MultipleChoice,
                Some(json!(["Growth", "Compensation", "Culture"])),
            ),
        ]
    }

    fn answer(question_id: i32, field: &str, value: Value) -> AnswerInput {
        serde_json::from_value(json!({ "questionId": question_id, field: value })).unwrap()
    }

    #[test]
    fn accepts_well_typed_answers() {
        let answers = vec![
            answer(1, "text", json!("Great team")),
            answer(2, "rating", json!(4)),
            answer(3, "selected", json!(["Growth", "Culture"])),
        ];

        let stored = validate_answers(&form(), &answers).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].text.as_deref(), Some("Great team"));
        assert_eq!(stored[1].rating, Some(4.0));
        assert_eq!(
            stored[2].selected,
            Some(vec!["Growth".to_string(), "Culture".to_string()])
        );
    }

    #[test]
    fn partial_and_empty_submissions_pass() {
        assert!(validate_answers(&form(), &[]).unwrap().is_empty());
        let only_rating = vec![answer(2, "rating", json!(3.5))];
        assert_eq!(validate_answers(&form(), &only_rating).unwrap().len(), 1);
    }

    #[test]
    fn foreign_question_is_rejected() {
        let err = validate_answers(&form(), &[answer(99, "text", json!("x"))]).unwrap_err();
        assert_eq!(err, "Question with ID 99 is not part of the form");
    }

    #[test]
    fn type_mismatches_name_the_question() {
        let err = validate_answers(&form(), &[answer(1, "text", json!(5))]).unwrap_err();
        assert_eq!(err, "Answer to question with ID 1 must be a string");

        let err = validate_answers(&form(), &[answer(2, "rating", json!("five"))]).unwrap_err();
        assert_eq!(err, "Answer to question with ID 2 must be a number");

        let err = validate_answers(&form(), &[answer(3, "selected", json!("Growth"))]).unwrap_err();
        assert_eq!(err, "Answer to question with ID 3 must be a list");
    }

    #[test]
    fn selection_must_be_subset_of_options() {
        let answers = vec![answer(3, "selected", json!(["Growth", "Snacks"]))];
        let err = validate_answers(&form(), &answers).unwrap_err();
        assert_eq!(err, "Invalid option \"Snacks\" for question with ID 3");
    }

    #[test]
    fn choice_without_options_is_rejected() {
        let questions = vec![question(4, QuestionType::MultipleChoice, Some(json!([])))];
        let err =
            validate_answers(&questions, &[answer(4, "selected", json!(["A"]))]).unwrap_err();
        assert_eq!(err, "Question with ID 4 has no valid options defined");
    }

    #[test]
    fn first_violation_wins() {
        let answers = vec![
            answer(1, "text", json!("fine")),
            answer(2, "rating", json!(null)),
            answer(99, "text", json!("x")),
        ];
        let err = validate_answers(&form(), &answers).unwrap_err();
        assert_eq!(err, "Answer to question with ID 2 must be a number");
    }

    #[test]
    fn extra_fields_are_kept_when_well_typed() {
        let input: AnswerInput = serde_json::from_value(json!({
            "questionId": 2,
            "rating": 5,
            "text": "Loved it"
        }))
        .unwrap();
        let stored = validate_answers(&form(), &[input]).unwrap();
        assert_eq!(stored[0].rating, Some(5.0));
        assert_eq!(stored[0].text.as_deref(), Some("Loved it"));

        let input: AnswerInput = serde_json::from_value(json!({
            "questionId": 2,
            "rating": 5,
            "selected": "nope"
        }))
        .unwrap();
        let err = validate_answers(&form(), &[input]).unwrap_err();
        assert_eq!(
            err,
            "Field 'selected' on answer to question with ID 2 has the wrong type"
        );
    }
}
