use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::{mistaken_words, time_spent};

/// A word the learner got wrong, with how many times it happened
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = mistaken_words)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MistakenWord {
    #[serde(rename = "id")]
    pub mistake_id: i32,
    pub user_id: i32,
    pub word_id: i32,
    pub word: String,
    pub correct_answer: String,
    pub user_answer: String,
    pub quiz_type: String,
    #[serde(rename = "timestamp")]
    pub last_mistake_at: NaiveDateTime,
    pub attempts: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRequest {
    pub word_id: i32,
    #[validate(length(min = 1, message = "word is required"))]
    pub word: String,
    #[validate(length(min = 1, message = "correctAnswer is required"))]
    pub correct_answer: String,
    #[validate(length(min = 1, message = "userAnswer is required"))]
    pub user_answer: String,
    #[validate(length(min = 1, message = "quizType is required"))]
    pub quiz_type: String,
}

#[derive(Insertable)]
#[diesel(table_name = mistaken_words)]
pub struct NewMistake<'a> {
    pub user_id: i32,
    pub word_id: i32,
    pub word: &'a str,
    pub correct_answer: &'a str,
    pub user_answer: &'a str,
    pub quiz_type: &'a str,
    pub last_mistake_at: NaiveDateTime,
    pub attempts: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = time_spent)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimeSpentRow {
    pub user_id: i32,
    pub day: NaiveDate,
    pub seconds: i32,
    pub last_active: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpentRequest {
    #[validate(range(
        min = 0,
        max = 86400,
        message = "timeSpent must be between 0 and 86400 seconds"
    ))]
    pub time_spent: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpentToday {
    pub date: NaiveDate,
    pub time_spent: i32,
    pub last_active: Option<NaiveDateTime>,
}

impl TimeSpentToday {
    pub fn new(date: NaiveDate, row: Option<TimeSpentRow>) -> Self {
        match row {
            Some(row) => Self {
                date,
                time_spent: row.seconds,
                last_active: Some(row.last_active),
            },
            None => Self {
                date,
                time_spent: 0,
                last_active: None,
            },
        }
    }
}
