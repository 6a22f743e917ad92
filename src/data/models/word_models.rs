use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::words;

sql_text_enum! {
    /// How hard a word or question is considered to be
    Difficulty {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
}

sql_text_enum! {
    /// Where a word currently sits in the review cycle
    ReviewStatus {
        New => "new",
        Learning => "learning",
        Known => "known",
        Skip => "skip",
    }
}

/// A vocabulary item as stored in the catalog
#[derive(Debug, Clone, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = words, primary_key(word_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    #[serde(rename = "id")]
    pub word_id: i32,
    pub english: String,
    pub hebrew: String,
    pub example: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub status: ReviewStatus,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub next_review_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Request payload for a single word
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewWordRequest {
    #[validate(length(min = 1, message = "English text is required"))]
    pub english: String,
    #[validate(length(min = 1, message = "Hebrew text is required"))]
    pub hebrew: String,
    #[validate(length(min = 1, message = "Example sentence is required"))]
    pub example: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub difficulty: Difficulty,
}

/// POST /api/words accepts either one word or an array of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WordPayload {
    Many(Vec<NewWordRequest>),
    One(NewWordRequest),
}

impl WordPayload {
    pub fn into_vec(self) -> Vec<NewWordRequest> {
        match self {
            WordPayload::Many(words) => words,
            WordPayload::One(word) => vec![word],
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = words)]
pub struct NewWord<'a> {
    pub english: &'a str,
    pub hebrew: &'a str,
    pub example: &'a str,
    pub category: &'a str,
    pub difficulty: Difficulty,
    pub status: ReviewStatus,
    pub next_review_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl<'a> NewWord<'a> {
    /// A freshly created word is new and immediately due
    pub fn from_request(request: &'a NewWordRequest, now: NaiveDateTime) -> Self {
        Self {
            english: request.english.trim(),
            hebrew: request.hebrew.trim(),
            example: request.example.trim(),
            category: request.category.trim(),
            difficulty: request.difficulty,
            status: ReviewStatus::New,
            next_review_at: now,
            created_at: now,
        }
    }
}

/// Body of PATCH /api/words/{id}; the status is kept as raw text so unknown
/// values can take the scheduler's fallback branch
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WordQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { page, limit, total, total_pages }
    }

    /// Rows to skip before `page`. `None` when the page is too far out to
    /// address.
    pub fn offset(page: i64, limit: i64) -> Option<i64> {
        page.checked_sub(1)?.checked_mul(limit)
    }
}

#[derive(Debug, Serialize)]
pub struct WordPage {
    pub words: Vec<WordItem>,
    pub pagination: Pagination,
}
