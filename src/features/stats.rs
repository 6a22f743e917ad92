use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::data::models::{AttemptRecord, DailyPractice, ProgressStats, ProgressStatus, Subject};

const AVERAGE_WINDOW_DAYS: i64 = 30;
const HISTORY_DAYS: i64 = 7;

/// Read-only summaries over a learner's attempts. All day boundaries are UTC.
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn summarize(
        total_words: i64,
        attempts: &[AttemptRecord],
        now: NaiveDateTime,
    ) -> ProgressStats {
        let (learned_words, in_progress_words) = latest_status_counts(attempts);
        ProgressStats {
            total_words,
            learned_words,
            in_progress_words,
            average_score: average_score(attempts, now),
            streak: streak(attempts),
            last_practice_date: attempts.iter().map(|a| a.recorded_at).max(),
            practice_history: practice_history(attempts, now.date()),
        }
    }
}

/// Counts subjects by the status of their most recent attempt
fn latest_status_counts(attempts: &[AttemptRecord]) -> (u32, u32) {
    let mut latest: HashMap<Subject, &AttemptRecord> = HashMap::new();
    for attempt in attempts.iter().filter(|a| a.subject != Subject::Simulation) {
        latest
            .entry(attempt.subject)
            .and_modify(|current| {
                if (attempt.recorded_at, attempt.id) > (current.recorded_at, current.id) {
                    *current = attempt;
                }
            })
            .or_insert(attempt);
    }

    latest.values().fold((0, 0), |(learned, in_progress), a| match a.status {
        ProgressStatus::Learned => (learned + 1, in_progress),
        ProgressStatus::InProgress => (learned, in_progress + 1),
        ProgressStatus::NotStarted => (learned, in_progress),
    })
}

/// Rounded percentage of correct answers in the trailing window; 0 when the
/// window holds no answered attempts
pub fn average_score(attempts: &[AttemptRecord], now: NaiveDateTime) -> u32 {
    let since = now - Duration::days(AVERAGE_WINDOW_DAYS);
    let (correct, total) = attempts
        .iter()
        .filter(|a| a.recorded_at >= since)
        .filter_map(|a| a.outcome.correct())
        .fold((0u32, 0u32), |(correct, total), c| (correct + u32::from(c), total + 1));

    if total == 0 {
        return 0;
    }
    (f64::from(correct) * 100.0 / f64::from(total)).round() as u32
}

/// Longest run of consecutive practice days
pub fn streak(attempts: &[AttemptRecord]) -> u32 {
    let mut days: Vec<NaiveDate> = attempts.iter().map(|a| a.recorded_at.date()).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));

    let mut previous: Option<NaiveDate> = None;
    let mut current = 0u32;
    let mut longest = 0u32;
    for day in days {
        match previous {
            Some(prev) if prev == day => continue,
            Some(prev) if prev - day == Duration::days(1) => current += 1,
            _ => current = 1,
        }
        longest = longest.max(current);
        previous = Some(day);
    }
    longest
}

/// Per-day totals for the last week ending `today`, oldest first. Days
/// without attempts are left out.
pub fn practice_history(attempts: &[AttemptRecord], today: NaiveDate) -> Vec<DailyPractice> {
    (0..HISTORY_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .filter_map(|date| {
            let (correct, total) = attempts
                .iter()
                .filter(|a| a.recorded_at.date() == date)
                .fold((0u32, 0u32), |(correct, total), a| {
                    (correct + u32::from(a.outcome.correct() == Some(true)), total + 1)
                });
            (total > 0).then_some(DailyPractice { date, correct, total })
        })
        .collect()
}
