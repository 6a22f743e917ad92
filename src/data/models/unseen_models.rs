use std::collections::HashSet;

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schema::{unseen_options, unseen_passages, unseen_questions};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = unseen_passages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PassageRow {
    pub passage_id: i32,
    pub passage: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = unseen_questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnseenQuestionRow {
    pub question_id: i32,
    pub passage_id: i32,
    pub position: i32,
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = unseen_options)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnseenOptionRow {
    pub option_row_id: i32,
    pub question_id: i32,
    pub position: i32,
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PassageOption {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub value: String,
}

/// Server-side passage including the answers. Deliberately not `Serialize`:
/// readers only ever receive a [`PublicPassage`].
#[derive(Debug, Clone)]
pub struct UnseenPassage {
    pub id: i32,
    pub passage: String,
    pub questions: Vec<UnseenQuestion>,
}

#[derive(Debug, Clone)]
pub struct UnseenQuestion {
    pub id: i32,
    pub prompt: String,
    pub options: Vec<PassageOption>,
    pub answer: String,
}

impl UnseenPassage {
    pub fn grade(&self, answers: &[String]) -> GradeReport {
        let results: Vec<bool> = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| answers.get(i).is_some_and(|a| a.trim() == q.answer))
            .collect();
        GradeReport {
            correct: results.iter().filter(|r| **r).count(),
            total: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPassage {
    pub id: i32,
    pub passage: String,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i32,
    pub question: String,
    pub options: Vec<PassageOption>,
}

impl From<UnseenPassage> for PublicPassage {
    fn from(passage: UnseenPassage) -> Self {
        Self {
            id: passage.id,
            passage: passage.passage,
            questions: passage
                .questions
                .into_iter()
                .map(|q| PublicQuestion { id: q.id, question: q.prompt, options: q.options })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPassageRequest {
    #[validate(length(min = 1, message = "Passage text is required"))]
    pub passage: String,
    #[validate(length(min = 1, message = "At least one question is required"), nested)]
    pub questions: Vec<NewUnseenQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_answer_listed"))]
pub struct NewUnseenQuestion {
    #[validate(length(min = 1, message = "Question text is required"))]
    pub question: String,
    #[validate(length(min = 2, message = "At least 2 options are required"), nested)]
    pub options: Vec<PassageOption>,
    pub answer: String,
}

fn validate_answer_listed(question: &NewUnseenQuestion) -> Result<(), ValidationError> {
    let mut values = HashSet::new();
    if !question.options.iter().all(|o| values.insert(o.value.trim())) {
        return Err(ValidationError::new("duplicate_option_value")
            .with_message("Option values must be unique".into()));
    }
    if !values.contains(question.answer.trim()) {
        return Err(ValidationError::new("unknown_answer")
            .with_message("Answer must match one of the option values".into()));
    }
    Ok(())
}

#[derive(Insertable)]
#[diesel(table_name = unseen_passages)]
pub struct NewPassageRow<'a> {
    pub passage: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = unseen_questions)]
pub struct NewUnseenQuestionRow<'a> {
    pub passage_id: i32,
    pub position: i32,
    pub prompt: &'a str,
    pub answer: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = unseen_options)]
pub struct NewUnseenOptionRow<'a> {
    pub question_id: i32,
    pub position: i32,
    pub text: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AnswerSheet {
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GradeReport {
    pub correct: usize,
    pub total: usize,
    pub results: Vec<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage() -> UnseenPassage {
        let option = |v: &str| PassageOption { text: format!("Option {v}"), value: v.into() };
        UnseenPassage {
            id: 7,
            passage: "Bees communicate through dance.".into(),
            questions: vec![
                UnseenQuestion {
                    id: 1,
                    prompt: "How do bees communicate?".into(),
                    options: vec![option("a"), option("b")],
                    answer: "a".into(),
                },
                UnseenQuestion {
                    id: 2,
                    prompt: "What is the main idea?".into(),
                    options: vec![option("a"), option("b")],
                    answer: "b".into(),
                },
            ],
        }
    }

    #[test]
    fn public_passage_never_carries_answers() {
        let json = serde_json::to_string(&PublicPassage::from(passage())).unwrap();
        assert!(!json.contains("\"answer\""));
        assert!(json.contains("How do bees communicate?"));
    }

    #[test]
    fn grading_counts_matching_answers() {
        let report = passage().grade(&["a".into(), "a".into()]);
        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.results, vec![true, false]);
    }

    #[test]
    fn missing_answers_are_wrong() {
        let report = passage().grade(&[]);
        assert_eq!(report.correct, 0);
        assert_eq!(report.results, vec![false, false]);
    }

    #[test]
    fn answer_must_be_an_option_value() {
        let question = NewUnseenQuestion {
            question: "Pick one".into(),
            options: vec![
                PassageOption { text: "A".into(), value: "a".into() },
                PassageOption { text: "B".into(), value: "b".into() },
            ],
            answer: "c".into(),
        };
        assert!(question.validate().is_err());
    }

    #[test]
    fn passage_needs_at_least_one_valid_question() {
        let empty = NewPassageRequest { passage: "Text".into(), questions: Vec::new() };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("questions"));

        let question = NewUnseenQuestion {
            question: "Pick one".into(),
            options: vec![
                PassageOption { text: "A".into(), value: "a".into() },
                PassageOption { text: "B".into(), value: "b".into() },
            ],
            answer: "a".into(),
        };
        let valid = NewPassageRequest { passage: "Text".into(), questions: vec![question.clone()] };
        assert!(valid.validate().is_ok());

        let broken = NewPassageRequest {
            passage: "Text".into(),
            questions: vec![NewUnseenQuestion { answer: "z".into(), ..question }],
        };
        assert!(broken.validate().is_err());
    }
}
