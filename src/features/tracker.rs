use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{
    AttemptInput, AttemptRecord, NewAttempt, Outcome, ProgressStats, ProgressStatus, ReviewStatus,
    SimulationRequest, SimulationRun, Subject,
};
use crate::data::repositories::{
    AttemptRepository, SentenceRepository, SimulationRepository, WordRepository,
};
use crate::features::errors::ApiError;
use crate::features::scheduler::{ReviewEvent, ReviewScheduler};
use crate::features::stats::StatsAggregator;

/// Records answered questions and reads them back per learner
pub struct ProgressTracker;

impl ProgressTracker {
    /// Stores one attempt. Every call inserts a new row; earlier attempts on
    /// the same subject are kept as history.
    pub fn record_attempt(
        conn: &mut SqliteConnection,
        user_id: i32,
        input: &AttemptInput,
        now: NaiveDateTime,
    ) -> Result<AttemptRecord, ApiError> {
        conn.transaction(|conn| {
            let next_review_at = Self::schedule_subject(conn, input, now)?;
            let status = input.status.unwrap_or_else(|| default_status(input.outcome));
            let prior = AttemptRepository::count_for_subject(conn, user_id, &input.subject)?;

            let number = prior as i32 + 1;
            let attempt = NewAttempt::new(user_id, input, status, now, next_review_at, number);
            let record = AttemptRepository::insert(conn, &attempt)?;
            log::info!(
                "User {} recorded attempt #{} on {:?}",
                user_id,
                record.attempt_number,
                record.subject
            );
            Ok(record)
        })
    }

    /// Next review date for the attempt. Vocabulary answers also move the word
    /// itself through the scheduler.
    fn schedule_subject(
        conn: &mut SqliteConnection,
        input: &AttemptInput,
        now: NaiveDateTime,
    ) -> Result<Option<NaiveDateTime>, ApiError> {
        let correct = input.outcome.correct().unwrap_or(false);
        match input.subject {
            Subject::Vocabulary { word_id } => {
                let word = WordRepository::find(conn, word_id)?.ok_or(ApiError::NotFound("Word"))?;
                let event = ReviewEvent::Answer { correct };
                let schedule = ReviewScheduler::schedule(event, word.status, now);
                WordRepository::apply_schedule(conn, word_id, &schedule)?;
                Ok(Some(schedule.next_review_at))
            }
            Subject::Sentence { question_id } => {
                if !SentenceRepository::exists(conn, question_id)? {
                    return Err(ApiError::NotFound("Sentence question"));
                }
                let event = ReviewEvent::Answer { correct };
                let schedule = ReviewScheduler::schedule(event, ReviewStatus::New, now);
                Ok(Some(schedule.next_review_at))
            }
            Subject::Simulation => Ok(None),
        }
    }

    /// Stores a finished exam together with its attempt, so the run counts
    /// toward the stats exactly once
    pub fn record_simulation(
        conn: &mut SqliteConnection,
        user_id: i32,
        request: &SimulationRequest,
        now: NaiveDateTime,
    ) -> Result<SimulationRun, ApiError> {
        conn.transaction(|conn| {
            let run = SimulationRepository::insert(conn, user_id, request, now)?;
            let input = AttemptInput {
                subject: Subject::Simulation,
                outcome: Outcome::Scored { score: run.score, total: run.total_questions },
                status: None,
            };
            Self::record_attempt(conn, user_id, &input, now)?;
            Ok(run)
        })
    }

    pub fn list_attempts(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<AttemptRecord>, ApiError> {
        AttemptRepository::list_for_user(conn, user_id)
    }

    pub fn mark_reviewed(
        conn: &mut SqliteConnection,
        user_id: i32,
        attempt_id: i32,
    ) -> Result<AttemptRecord, ApiError> {
        AttemptRepository::increment_review(conn, user_id, attempt_id)?
            .ok_or(ApiError::NotFound("Progress record"))
    }

    pub fn stats(
        conn: &mut SqliteConnection,
        user_id: i32,
        now: NaiveDateTime,
    ) -> Result<ProgressStats, ApiError> {
        let total_words = WordRepository::count(conn)?;
        let attempts = AttemptRepository::list_for_user(conn, user_id)?;
        Ok(StatsAggregator::summarize(total_words, &attempts, now))
    }
}

fn default_status(outcome: Outcome) -> ProgressStatus {
    match outcome.correct() {
        Some(true) => ProgressStatus::Learned,
        _ => ProgressStatus::InProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Difficulty, NewWordRequest, WordItem};
    use crate::data::repositories::UserRepository;
    use crate::db::test_pool;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn setup(conn: &mut SqliteConnection) -> (i32, WordItem) {
        let user =
            UserRepository::create_user(conn, "learner@example.com", "Learner", "password1", 4)
                .unwrap();
        let words = WordRepository::insert_many(
            conn,
            &[NewWordRequest {
                english: "Assiduity".into(),
                hebrew: "התמדה, חריצות".into(),
                example: "Her assiduity impressed all her teachers.".into(),
                category: "Quality".into(),
                difficulty: Difficulty::Hard,
            }],
            now(),
        )
        .unwrap();
        (user.user_id, words.into_iter().next().unwrap())
    }

    fn answer(word_id: i32, correct: bool) -> AttemptInput {
        AttemptInput {
            subject: Subject::Vocabulary { word_id },
            outcome: Outcome::Answered { correct },
            status: None,
        }
    }

    fn save(conn: &mut SqliteConnection, user_id: i32, input: &AttemptInput) -> AttemptRecord {
        ProgressTracker::record_attempt(conn, user_id, input, now()).unwrap()
    }

    #[test]
    fn attempts_are_numbered_per_subject() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, word) = setup(&mut conn);

        let first = save(&mut conn, user_id, &answer(word.word_id, false));
        let second = save(&mut conn, user_id, &answer(word.word_id, true));
        assert_eq!(first.attempt_number, 1);
        assert_eq!(second.attempt_number, 2);
        assert_ne!(first.id, second.id);
        assert_eq!(first.status, ProgressStatus::InProgress);
        assert_eq!(second.status, ProgressStatus::Learned);
        assert_eq!(ProgressTracker::list_attempts(&mut conn, user_id).unwrap().len(), 2);
    }

    #[test]
    fn answering_reschedules_the_word() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, word) = setup(&mut conn);

        let record = save(&mut conn, user_id, &answer(word.word_id, false));
        assert_eq!(record.next_review_at, Some(now() + Duration::minutes(30)));

        let word = WordRepository::find(&mut conn, word.word_id).unwrap().unwrap();
        assert_eq!(word.status, ReviewStatus::Learning);
        assert_eq!(word.last_reviewed_at, Some(now()));
        assert_eq!(word.next_review_at, now() + Duration::minutes(30));
    }

    #[test]
    fn unknown_subjects_are_not_found() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, _) = setup(&mut conn);

        let missing = answer(999, true);
        let err = ProgressTracker::record_attempt(&mut conn, user_id, &missing, now()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Word")));

        let sentence = AttemptInput {
            subject: Subject::Sentence { question_id: 5 },
            outcome: Outcome::Answered { correct: true },
            status: None,
        };
        let err =
            ProgressTracker::record_attempt(&mut conn, user_id, &sentence, now()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn simulation_attempts_have_no_next_review() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, _) = setup(&mut conn);
        let input = AttemptInput {
            subject: Subject::Simulation,
            outcome: Outcome::Scored { score: 30, total: 40 },
            status: Some(ProgressStatus::Learned),
        };
        let record = ProgressTracker::record_attempt(&mut conn, user_id, &input, now()).unwrap();
        assert_eq!(record.next_review_at, None);
        assert_eq!(record.status, ProgressStatus::Learned);
    }

    #[test]
    fn a_finished_exam_is_one_run_and_one_attempt() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, _) = setup(&mut conn);
        let request = SimulationRequest {
            score: 18,
            total_questions: 20,
            answers: Default::default(),
            time_spent: 1500,
        };

        let run = ProgressTracker::record_simulation(&mut conn, user_id, &request, now()).unwrap();
        assert_eq!(SimulationRepository::list_for_user(&mut conn, user_id).unwrap().len(), 1);

        let attempts = ProgressTracker::list_attempts(&mut conn, user_id).unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].subject, Subject::Simulation);
        assert!(matches!(attempts[0].outcome, Outcome::Scored { score: 18, total: 20 }));
        assert_eq!(attempts[0].recorded_at, run.completed_at);
    }

    #[test]
    fn review_counter_only_moves_for_the_owner() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, word) = setup(&mut conn);
        let record = save(&mut conn, user_id, &answer(word.word_id, true));

        let reviewed = ProgressTracker::mark_reviewed(&mut conn, user_id, record.id).unwrap();
        assert_eq!(reviewed.review_count, 1);
        assert!(matches!(
            ProgressTracker::mark_reviewed(&mut conn, user_id + 1, record.id),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn a_correct_answer_adds_one_learned_word() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let (user_id, word) = setup(&mut conn);

        let before = ProgressTracker::stats(&mut conn, user_id, now()).unwrap();
        save(&mut conn, user_id, &answer(word.word_id, true));
        let after = ProgressTracker::stats(&mut conn, user_id, now()).unwrap();

        assert_eq!(after.learned_words, before.learned_words + 1);
        assert_eq!(after.total_words, 1);
        assert_eq!(after.average_score, 100);
        assert_eq!(after.streak, 1);
    }
}
