use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::data::models::{Difficulty, NewWord, NewWordRequest, ReviewStatus, WordItem};
use crate::data::seed;
use crate::db::last_insert_id;
use crate::features::errors::ApiError;
use crate::features::scheduler::ReviewSchedule;
use crate::schema::words;

/// Which part of the catalog a learner is offered
#[derive(Debug, Clone)]
pub struct WordFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    /// Words with a pending (not yet due) attempt by the learner
    pub exclude: Vec<i32>,
    pub due_before: NaiveDateTime,
}

pub struct WordRepository;

impl WordRepository {
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        words::table.count().get_result(conn)
    }

    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<WordItem>> {
        words::table
            .order(words::word_id.asc())
            .select(WordItem::as_select())
            .load(conn)
    }

    pub fn find(conn: &mut SqliteConnection, word_id: i32) -> QueryResult<Option<WordItem>> {
        words::table
            .find(word_id)
            .select(WordItem::as_select())
            .first(conn)
            .optional()
    }

    pub fn insert_many(
        conn: &mut SqliteConnection,
        requests: &[NewWordRequest],
        now: NaiveDateTime,
    ) -> QueryResult<Vec<WordItem>> {
        conn.transaction(|conn| {
            let mut ids = Vec::with_capacity(requests.len());
            for request in requests {
                diesel::insert_into(words::table)
                    .values(NewWord::from_request(request, now))
                    .execute(conn)?;
                ids.push(last_insert_id(conn)?);
            }

            words::table
                .filter(words::word_id.eq_any(&ids))
                .order(words::word_id.asc())
                .select(WordItem::as_select())
                .load(conn)
        })
    }

    fn filtered(filter: &WordFilter) -> words::BoxedQuery<'_, Sqlite> {
        let mut query = words::table
            .filter(words::next_review_at.le(filter.due_before))
            .into_boxed();
        if let Some(difficulty) = filter.difficulty {
            query = query.filter(words::difficulty.eq(difficulty));
        }
        if let Some(category) = filter.category.as_deref() {
            query = query.filter(words::category.eq(category));
        }
        if !filter.exclude.is_empty() {
            query = query.filter(words::word_id.ne_all(&filter.exclude));
        }
        query
    }

    /// Up to `limit` due words starting at `offset`, plus the total number of
    /// matches
    pub fn page(
        conn: &mut SqliteConnection,
        filter: &WordFilter,
        offset: i64,
        limit: i64,
    ) -> QueryResult<(Vec<WordItem>, i64)> {
        let total: i64 = Self::filtered(filter).count().get_result(conn)?;
        let items = Self::filtered(filter)
            .order(words::word_id.asc())
            .limit(limit)
            .offset(offset)
            .load::<WordItem>(conn)?;
        Ok((items, total))
    }

    /// Words that are new or whose learning review is due. Falls back to any
    /// words when nothing qualifies.
    pub fn next_batch(
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
        limit: i64,
    ) -> QueryResult<Vec<WordItem>> {
        let due = words::table
            .filter(
                words::status.eq(ReviewStatus::New).or(words::status
                    .eq(ReviewStatus::Learning)
                    .and(words::next_review_at.le(now))),
            )
            .order(words::next_review_at.asc())
            .limit(limit)
            .select(WordItem::as_select())
            .load(conn)?;

        if !due.is_empty() {
            return Ok(due);
        }

        words::table
            .order(words::word_id.asc())
            .limit(limit)
            .select(WordItem::as_select())
            .load(conn)
    }

    /// Stamps a scheduler decision onto the word. `None` when it does not exist.
    pub fn apply_schedule(
        conn: &mut SqliteConnection,
        word_id: i32,
        schedule: &ReviewSchedule,
    ) -> QueryResult<Option<WordItem>> {
        let updated = diesel::update(words::table.find(word_id))
            .set((
                words::status.eq(schedule.status),
                words::last_reviewed_at.eq(Some(schedule.last_reviewed_at)),
                words::next_review_at.eq(schedule.next_review_at),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Ok(None);
        }
        Self::find(conn, word_id)
    }

    /// Fills an empty catalog with the bundled words
    pub fn seed_if_empty(
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<usize, ApiError> {
        if Self::count(conn)? > 0 {
            return Ok(0);
        }
        let words = seed::words()?;
        let inserted = Self::insert_many(conn, &words, now)?;
        log::info!("Seeded {} words into an empty catalog", inserted.len());
        Ok(inserted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::features::scheduler::{ReviewEvent, ReviewScheduler};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn word(english: &str, difficulty: Difficulty, category: &str) -> NewWordRequest {
        NewWordRequest {
            english: english.into(),
            hebrew: format!("{english} (he)"),
            example: format!("An example with {english}."),
            category: category.into(),
            difficulty,
        }
    }

    fn everything(now: NaiveDateTime) -> WordFilter {
        WordFilter { difficulty: None, category: None, exclude: Vec::new(), due_before: now }
    }

    #[test]
    fn inserted_words_start_new_and_due() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let created = WordRepository::insert_many(
            &mut conn,
            &[
                word("Ephemeral", Difficulty::Hard, "Time"),
                word("Pragmatic", Difficulty::Medium, "Personality"),
            ],
            now(),
        )
        .unwrap();

        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|w| w.status == ReviewStatus::New));
        assert!(created.iter().all(|w| w.next_review_at == now()));
        assert!(created.iter().all(|w| w.last_reviewed_at.is_none()));
    }

    #[test]
    fn page_filters_and_excludes() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let created = WordRepository::insert_many(
            &mut conn,
            &[
                word("Ambiguous", Difficulty::Medium, "Description"),
                word("Resilient", Difficulty::Medium, "Personality"),
                word("Serendipity", Difficulty::Hard, "Events"),
            ],
            now(),
        )
        .unwrap();

        let medium = WordFilter { difficulty: Some(Difficulty::Medium), ..everything(now()) };
        let (items, total) = WordRepository::page(&mut conn, &medium, 0, 10).unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 2);

        let without_first = WordFilter { exclude: vec![created[0].word_id], ..medium };
        let (items, total) = WordRepository::page(&mut conn, &without_first, 0, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].english, "Resilient");

        let (second_page, total) =
            WordRepository::page(&mut conn, &everything(now()), 2, 2).unwrap();
        assert_eq!(total, 3);
        assert_eq!(second_page.len(), 1);
    }

    #[test]
    fn scheduled_words_drop_out_until_due() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let palliative = word("Palliative", Difficulty::Hard, "Medicine");
        let created = WordRepository::insert_many(&mut conn, &[palliative], now()).unwrap();

        let event = ReviewEvent::StatusChange(ReviewStatus::Known);
        let schedule = ReviewScheduler::schedule(event, ReviewStatus::New, now());
        let updated = WordRepository::apply_schedule(&mut conn, created[0].word_id, &schedule)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ReviewStatus::Known);
        assert_eq!(updated.last_reviewed_at, Some(now()));

        let (items, _) = WordRepository::page(&mut conn, &everything(now()), 0, 10).unwrap();
        assert!(items.is_empty());
        let later = now() + Duration::days(8);
        let (items, _) = WordRepository::page(&mut conn, &everything(later), 0, 10).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn scheduling_a_missing_word_returns_none() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let event = ReviewEvent::StatusChange(ReviewStatus::Skip);
        let schedule = ReviewScheduler::schedule(event, ReviewStatus::New, now());
        assert!(WordRepository::apply_schedule(&mut conn, 404, &schedule).unwrap().is_none());
    }

    #[test]
    fn next_batch_falls_back_to_any_words() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let solipsism = word("Solipsism", Difficulty::Hard, "Philosophy");
        let created = WordRepository::insert_many(&mut conn, &[solipsism], now()).unwrap();
        assert_eq!(WordRepository::next_batch(&mut conn, now(), 10).unwrap().len(), 1);

        let event = ReviewEvent::StatusChange(ReviewStatus::Skip);
        let schedule = ReviewScheduler::schedule(event, ReviewStatus::New, now());
        WordRepository::apply_schedule(&mut conn, created[0].word_id, &schedule).unwrap();
        let batch = WordRepository::next_batch(&mut conn, now(), 10).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].status, ReviewStatus::Skip);
    }

    #[test]
    fn seeding_only_touches_an_empty_catalog() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let seeded = WordRepository::seed_if_empty(&mut conn, now()).unwrap();
        assert!(seeded > 0);
        assert_eq!(WordRepository::seed_if_empty(&mut conn, now()).unwrap(), 0);
        assert_eq!(WordRepository::count(&mut conn).unwrap(), seeded as i64);
    }
}
