use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{
    NewSentenceOption, NewSentenceQuestion, NewSentenceRow, SentenceOptionRow, SentenceQuestion,
    SentenceQuestionRow,
};
use crate::data::seed;
use crate::db::last_insert_id;
use crate::features::errors::ApiError;
use crate::schema::{sentence_options, sentence_questions};

pub struct SentenceRepository;

impl SentenceRepository {
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        sentence_questions::table.count().get_result(conn)
    }

    pub fn exists(conn: &mut SqliteConnection, question_id: i32) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(sentence_questions::table.find(question_id)))
            .get_result(conn)
    }

    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<SentenceQuestion>> {
        let rows = sentence_questions::table
            .order(sentence_questions::question_id.asc())
            .select(SentenceQuestionRow::as_select())
            .load(conn)?;
        Self::attach_options(conn, rows)
    }

    fn attach_options(
        conn: &mut SqliteConnection,
        rows: Vec<SentenceQuestionRow>,
    ) -> QueryResult<Vec<SentenceQuestion>> {
        let ids: Vec<i32> = rows.iter().map(|r| r.question_id).collect();
        let mut grouped: HashMap<i32, Vec<SentenceOptionRow>> = HashMap::new();
        for option in sentence_options::table
            .filter(sentence_options::question_id.eq_any(&ids))
            .select(SentenceOptionRow::as_select())
            .load(conn)?
        {
            grouped.entry(option.question_id).or_default().push(option);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let options = grouped.remove(&row.question_id).unwrap_or_default();
                SentenceQuestion::from_rows(row, options)
            })
            .collect())
    }

    /// Inserts every question with its options, all or nothing
    pub fn insert_many(
        conn: &mut SqliteConnection,
        questions: &[NewSentenceQuestion],
        now: NaiveDateTime,
    ) -> QueryResult<Vec<SentenceQuestion>> {
        conn.transaction(|conn| {
            let mut ids = Vec::with_capacity(questions.len());
            for question in questions {
                diesel::insert_into(sentence_questions::table)
                    .values(NewSentenceRow {
                        before_blank: question.before_blank.trim(),
                        after_blank: question.after_blank.trim(),
                        correct_option_id: question.correct_option_id,
                        difficulty: question.difficulty,
                        category: question.category.trim(),
                        created_at: now,
                    })
                    .execute(conn)?;
                let question_id = last_insert_id(conn)?;

                let options: Vec<NewSentenceOption> = question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(position, option)| NewSentenceOption {
                        question_id,
                        option_id: option.id,
                        position: position as i32,
                        text: option.text.trim(),
                    })
                    .collect();
                diesel::insert_into(sentence_options::table)
                    .values(&options)
                    .execute(conn)?;
                ids.push(question_id);
            }

            let rows = sentence_questions::table
                .filter(sentence_questions::question_id.eq_any(&ids))
                .order(sentence_questions::question_id.asc())
                .select(SentenceQuestionRow::as_select())
                .load(conn)?;
            Self::attach_options(conn, rows)
        })
    }

    pub fn seed_if_empty(
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<usize, ApiError> {
        if Self::count(conn)? > 0 {
            return Ok(0);
        }
        let questions = seed::sentence_questions()?;
        let inserted = Self::insert_many(conn, &questions, now)?;
        log::info!("Seeded {} sentence questions", inserted.len());
        Ok(inserted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Difficulty, SentenceOption};
    use crate::db::test_pool;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn options_keep_their_order_and_ids() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let question = NewSentenceQuestion {
            before_blank: "The scientist's".into(),
            after_blank: "theory was widely accepted.".into(),
            options: vec![
                SentenceOption { id: 4, text: "radical".into() },
                SentenceOption { id: 1, text: "plausible".into() },
                SentenceOption { id: 9, text: "absurd".into() },
            ],
            correct_option_id: 1,
            difficulty: Difficulty::Medium,
            category: "Science".into(),
        };

        let created = SentenceRepository::insert_many(&mut conn, &[question], now()).unwrap();
        assert_eq!(created.len(), 1);

        let found = SentenceRepository::list_all(&mut conn).unwrap().pop().unwrap();
        assert_eq!(found.id, created[0].id);
        let ids: Vec<i32> = found.options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![4, 1, 9]);
        assert_eq!(found.correct_option_id, 1);
        assert!(SentenceRepository::exists(&mut conn, found.id).unwrap());
        assert!(!SentenceRepository::exists(&mut conn, found.id + 1).unwrap());
    }

    #[test]
    fn seeding_is_skipped_when_questions_exist() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let seeded = SentenceRepository::seed_if_empty(&mut conn, now()).unwrap();
        assert!(seeded > 0);
        assert_eq!(SentenceRepository::seed_if_empty(&mut conn, now()).unwrap(), 0);
        let all = SentenceRepository::list_all(&mut conn).unwrap();
        assert_eq!(all.len(), seeded);
        assert!(all.iter().all(|q| q.options.iter().any(|o| o.id == q.correct_option_id)));
    }
}
