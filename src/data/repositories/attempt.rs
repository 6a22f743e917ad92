use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{AttemptRecord, AttemptRow, NewAttempt, Subject, SubjectKind};
use crate::db::last_insert_id;
use crate::features::errors::ApiError;
use crate::schema::attempts;

pub struct AttemptRepository;

impl AttemptRepository {
    pub fn insert(
        conn: &mut SqliteConnection,
        attempt: &NewAttempt,
    ) -> Result<AttemptRecord, ApiError> {
        diesel::insert_into(attempts::table).values(attempt).execute(conn)?;
        let attempt_id = last_insert_id(conn)?;
        Self::find(conn, attempt_id)?
            .ok_or_else(|| ApiError::Internal("inserted attempt vanished".into()))
    }

    pub fn find(
        conn: &mut SqliteConnection,
        attempt_id: i32,
    ) -> Result<Option<AttemptRecord>, ApiError> {
        attempts::table
            .find(attempt_id)
            .select(AttemptRow::as_select())
            .first(conn)
            .optional()?
            .map(AttemptRecord::try_from)
            .transpose()
    }

    /// Number of attempts the learner already made on this subject
    pub fn count_for_subject(
        conn: &mut SqliteConnection,
        user_id: i32,
        subject: &Subject,
    ) -> QueryResult<i64> {
        let query = attempts::table
            .filter(attempts::user_id.eq(user_id))
            .into_boxed();
        let query = match subject {
            Subject::Vocabulary { word_id } => query.filter(attempts::word_id.eq(*word_id)),
            Subject::Sentence { question_id } => {
                query.filter(attempts::question_id.eq(*question_id))
            }
            Subject::Simulation => query.filter(attempts::subject_kind.eq(SubjectKind::Simulation)),
        };
        query.count().get_result(conn)
    }

    /// All attempts of a learner, newest first
    pub fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<AttemptRecord>, ApiError> {
        attempts::table
            .filter(attempts::user_id.eq(user_id))
            .order((attempts::recorded_at.desc(), attempts::attempt_id.desc()))
            .select(AttemptRow::as_select())
            .load(conn)?
            .into_iter()
            .map(AttemptRecord::try_from)
            .collect()
    }

    /// Words the learner answered whose next review is still in the future
    pub fn pending_word_ids(
        conn: &mut SqliteConnection,
        user_id: i32,
        now: NaiveDateTime,
    ) -> QueryResult<Vec<i32>> {
        let ids: Vec<Option<i32>> = attempts::table
            .filter(attempts::user_id.eq(user_id))
            .filter(attempts::word_id.is_not_null())
            .filter(attempts::next_review_at.gt(now))
            .select(attempts::word_id)
            .distinct()
            .load(conn)?;
        Ok(ids.into_iter().flatten().collect())
    }

    /// Bumps the review counter, the only field that changes after creation
    pub fn increment_review(
        conn: &mut SqliteConnection,
        user_id: i32,
        attempt_id: i32,
    ) -> Result<Option<AttemptRecord>, ApiError> {
        let updated = diesel::update(
            attempts::table
                .filter(attempts::attempt_id.eq(attempt_id))
                .filter(attempts::user_id.eq(user_id)),
        )
        .set(attempts::review_count.eq(attempts::review_count + 1))
        .execute(conn)?;

        if updated == 0 {
            return Ok(None);
        }
        Self::find(conn, attempt_id)
    }
}
