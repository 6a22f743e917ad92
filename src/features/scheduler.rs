use chrono::{Duration, NaiveDateTime};

use crate::data::models::ReviewStatus;

/// What happened to a word that needs a new review date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    /// The learner picked a status explicitly
    StatusChange(ReviewStatus),
    /// The learner answered a question about the word
    Answer { correct: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSchedule {
    pub status: ReviewStatus,
    pub last_reviewed_at: NaiveDateTime,
    pub next_review_at: NaiveDateTime,
}

/// Fixed-interval review table. There is no ease factor and intervals never
/// grow with repetition.
pub struct ReviewScheduler;

impl ReviewScheduler {
    pub fn schedule(event: ReviewEvent, prior: ReviewStatus, now: NaiveDateTime) -> ReviewSchedule {
        let (status, delay) = match event {
            ReviewEvent::StatusChange(ReviewStatus::Known) => {
                (ReviewStatus::Known, Duration::days(7))
            }
            ReviewEvent::StatusChange(ReviewStatus::Learning) => {
                (ReviewStatus::Learning, Duration::days(1))
            }
            ReviewEvent::StatusChange(ReviewStatus::Skip) => {
                (ReviewStatus::Skip, Duration::days(3))
            }
            ReviewEvent::StatusChange(ReviewStatus::New) => (ReviewStatus::New, Duration::zero()),
            ReviewEvent::Answer { correct: false } => {
                (ReviewStatus::Learning, Duration::minutes(30))
            }
            ReviewEvent::Answer { correct: true } if prior == ReviewStatus::Known => {
                (ReviewStatus::Known, Duration::days(7))
            }
            ReviewEvent::Answer { correct: true } => (ReviewStatus::Learning, Duration::hours(24)),
        };

        ReviewSchedule {
            status,
            last_reviewed_at: now,
            next_review_at: now + delay,
        }
    }

    /// Status text from a client. Anything unrecognized lands on `New`,
    /// which reschedules the word for right now.
    pub fn parse_status_lossy(raw: &str) -> ReviewStatus {
        raw.trim().to_ascii_lowercase().parse().unwrap_or_else(|_| {
            log::warn!("Unrecognized review status `{}`, treating it as new", raw);
            ReviewStatus::New
        })
    }
}
