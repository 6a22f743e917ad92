use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{MistakeRequest, MistakenWord, NewMistake, TimeSpentRow};
use crate::schema::{mistaken_words, time_spent};

/// Upper bound of the daily total
const SECONDS_PER_DAY: i32 = 24 * 60 * 60;

diesel::define_sql_function! {
    /// SQLite's two argument scalar `min`
    #[sql_name = "min"]
    fn least(a: Integer, b: Integer) -> Integer;
}

/// Mistake log and daily time tracking of a learner
pub struct ActivityRepository;

impl ActivityRepository {
    /// A repeated mistake on the same word bumps its counter instead of
    /// adding another row
    pub fn record_mistake(
        conn: &mut SqliteConnection,
        user_id: i32,
        request: &MistakeRequest,
        now: NaiveDateTime,
    ) -> QueryResult<MistakenWord> {
        diesel::insert_into(mistaken_words::table)
            .values(NewMistake {
                user_id,
                word_id: request.word_id,
                word: request.word.trim(),
                correct_answer: request.correct_answer.trim(),
                user_answer: request.user_answer.trim(),
                quiz_type: request.quiz_type.trim(),
                last_mistake_at: now,
                attempts: 1,
            })
            .on_conflict((mistaken_words::user_id, mistaken_words::word_id))
            .do_update()
            .set((
                mistaken_words::attempts.eq(mistaken_words::attempts + 1),
                mistaken_words::user_answer.eq(request.user_answer.trim()),
                mistaken_words::quiz_type.eq(request.quiz_type.trim()),
                mistaken_words::last_mistake_at.eq(now),
            ))
            .execute(conn)?;

        mistaken_words::table
            .filter(mistaken_words::user_id.eq(user_id))
            .filter(mistaken_words::word_id.eq(request.word_id))
            .select(MistakenWord::as_select())
            .first(conn)
    }

    pub fn list_mistakes(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> QueryResult<Vec<MistakenWord>> {
        mistaken_words::table
            .filter(mistaken_words::user_id.eq(user_id))
            .order((mistaken_words::last_mistake_at.desc(), mistaken_words::mistake_id.desc()))
            .select(MistakenWord::as_select())
            .load(conn)
    }

    /// Adds seconds to the learner's total for the day `now` falls on. The
    /// total never goes past [`SECONDS_PER_DAY`].
    pub fn add_time_spent(
        conn: &mut SqliteConnection,
        user_id: i32,
        seconds: i32,
        now: NaiveDateTime,
    ) -> QueryResult<TimeSpentRow> {
        let day = now.date();
        let seconds = seconds.clamp(0, SECONDS_PER_DAY);
        diesel::insert_into(time_spent::table)
            .values(&TimeSpentRow { user_id, day, seconds, last_active: now })
            .on_conflict((time_spent::user_id, time_spent::day))
            .do_update()
            .set((
                time_spent::seconds.eq(least(time_spent::seconds + seconds, SECONDS_PER_DAY)),
                time_spent::last_active.eq(now),
            ))
            .execute(conn)?;

        time_spent::table
            .find((user_id, day))
            .select(TimeSpentRow::as_select())
            .first(conn)
    }

    pub fn time_spent_on(
        conn: &mut SqliteConnection,
        user_id: i32,
        day: NaiveDate,
    ) -> QueryResult<Option<TimeSpentRow>> {
        time_spent::table
            .find((user_id, day))
            .select(TimeSpentRow::as_select())
            .first(conn)
            .optional()
    }
}
