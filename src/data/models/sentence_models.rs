use std::collections::HashSet;

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Difficulty;
use crate::schema::{sentence_options, sentence_questions};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sentence_questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SentenceQuestionRow {
    pub question_id: i32,
    pub before_blank: String,
    pub after_blank: String,
    pub correct_option_id: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sentence_options)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SentenceOptionRow {
    pub question_id: i32,
    pub option_id: i32,
    pub position: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SentenceOption {
    pub id: i32,
    #[validate(length(min = 1, message = "Option text is required"))]
    pub text: String,
}

/// A fill-in-the-blank question with its ordered options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceQuestion {
    pub id: i32,
    pub before_blank: String,
    pub after_blank: String,
    pub options: Vec<SentenceOption>,
    pub correct_option_id: i32,
    pub difficulty: Difficulty,
    pub category: String,
}

impl SentenceQuestion {
    pub fn from_rows(row: SentenceQuestionRow, mut options: Vec<SentenceOptionRow>) -> Self {
        options.sort_by_key(|o| o.position);
        Self {
            id: row.question_id,
            before_blank: row.before_blank,
            after_blank: row.after_blank,
            options: options
                .into_iter()
                .map(|o| SentenceOption { id: o.option_id, text: o.text })
                .collect(),
            correct_option_id: row.correct_option_id,
            difficulty: row.difficulty,
            category: row.category,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_correct_option"))]
pub struct NewSentenceQuestion {
    #[validate(length(min = 1, message = "Text before the blank is required"))]
    pub before_blank: String,
    pub after_blank: String,
    #[validate(length(min = 2, message = "At least 2 options are required"), nested)]
    pub options: Vec<SentenceOption>,
    pub correct_option_id: i32,
    pub difficulty: Difficulty,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

/// POST /api/sentence-questions accepts one question or an array of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SentencePayload {
    Many(Vec<NewSentenceQuestion>),
    One(NewSentenceQuestion),
}

impl SentencePayload {
    pub fn into_vec(self) -> Vec<NewSentenceQuestion> {
        match self {
            SentencePayload::Many(questions) => questions,
            SentencePayload::One(question) => vec![question],
        }
    }
}

fn validate_correct_option(question: &NewSentenceQuestion) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if !question.options.iter().all(|o| seen.insert(o.id)) {
        return Err(ValidationError::new("duplicate_option_id")
            .with_message("Option ids must be unique".into()));
    }
    if !seen.contains(&question.correct_option_id) {
        return Err(ValidationError::new("unknown_correct_option")
            .with_message("Correct option ID must match one of the provided options".into()));
    }
    Ok(())
}

#[derive(Insertable)]
#[diesel(table_name = sentence_questions)]
pub struct NewSentenceRow<'a> {
    pub before_blank: &'a str,
    pub after_blank: &'a str,
    pub correct_option_id: i32,
    pub difficulty: Difficulty,
    pub category: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = sentence_options)]
pub struct NewSentenceOption<'a> {
    pub question_id: i32,
    pub option_id: i32,
    pub position: i32,
    pub text: &'a str,
}
