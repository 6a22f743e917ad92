use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::features::errors::ApiError;
use crate::schema::attempts;

sql_text_enum! {
    /// Learner-facing progress label attached to every attempt
    ProgressStatus {
        Learned => "learned",
        InProgress => "in_progress",
        NotStarted => "not_started",
    }
}

sql_text_enum! {
    SubjectKind {
        Vocabulary => "vocabulary",
        Sentence => "sentence",
        Simulation => "simulation",
    }
}

/// What an attempt was scored against. Exactly one reference exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Subject {
    Vocabulary {
        #[serde(rename = "wordId")]
        word_id: i32,
    },
    Sentence {
        #[serde(rename = "questionId")]
        question_id: i32,
    },
    Simulation,
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Vocabulary { .. } => SubjectKind::Vocabulary,
            Subject::Sentence { .. } => SubjectKind::Sentence,
            Subject::Simulation => SubjectKind::Simulation,
        }
    }

    pub fn word_id(&self) -> Option<i32> {
        match self {
            Subject::Vocabulary { word_id } => Some(*word_id),
            _ => None,
        }
    }

    pub fn question_id(&self) -> Option<i32> {
        match self {
            Subject::Sentence { question_id } => Some(*question_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Answered {
        #[serde(rename = "isCorrect")]
        correct: bool,
    },
    Scored {
        score: i32,
        #[serde(rename = "totalQuestions")]
        total: i32,
    },
}

impl Outcome {
    /// Boolean correctness; simulation scores have none
    pub fn correct(&self) -> Option<bool> {
        match self {
            Outcome::Answered { correct } => Some(*correct),
            Outcome::Scored { .. } => None,
        }
    }
}

/// Row shape of the `attempts` table
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attempts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttemptRow {
    pub attempt_id: i32,
    pub user_id: i32,
    pub word_id: Option<i32>,
    pub question_id: Option<i32>,
    pub subject_kind: SubjectKind,
    pub is_correct: Option<bool>,
    pub score: Option<i32>,
    pub total_questions: Option<i32>,
    pub status: ProgressStatus,
    pub recorded_at: NaiveDateTime,
    pub next_review_at: Option<NaiveDateTime>,
    pub attempt_number: i32,
    pub review_count: i32,
}

/// One answered question (or finished simulation) by one learner
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: i32,
    pub user_id: i32,
    #[serde(flatten)]
    pub subject: Subject,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub status: ProgressStatus,
    #[serde(rename = "createdAt")]
    pub recorded_at: NaiveDateTime,
    #[serde(rename = "nextReview")]
    pub next_review_at: Option<NaiveDateTime>,
    pub attempt_number: i32,
    pub review_count: i32,
}

impl TryFrom<AttemptRow> for AttemptRecord {
    type Error = ApiError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        let subject = match (row.subject_kind, row.word_id, row.question_id) {
            (SubjectKind::Vocabulary, Some(word_id), None) => Subject::Vocabulary { word_id },
            (SubjectKind::Sentence, None, Some(question_id)) => Subject::Sentence { question_id },
            (SubjectKind::Simulation, None, None) => Subject::Simulation,
            _ => {
                return Err(ApiError::Internal(format!(
                    "attempt {} has inconsistent subject references",
                    row.attempt_id
                )));
            }
        };

        let outcome = match (row.is_correct, row.score, row.total_questions) {
            (Some(correct), _, _) => Outcome::Answered { correct },
            (None, Some(score), Some(total)) => Outcome::Scored { score, total },
            _ => {
                return Err(ApiError::Internal(format!(
                    "attempt {} has no outcome",
                    row.attempt_id
                )));
            }
        };

        Ok(AttemptRecord {
            id: row.attempt_id,
            user_id: row.user_id,
            subject,
            outcome,
            status: row.status,
            recorded_at: row.recorded_at,
            next_review_at: row.next_review_at,
            attempt_number: row.attempt_number,
            review_count: row.review_count,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = attempts)]
pub struct NewAttempt {
    pub user_id: i32,
    pub word_id: Option<i32>,
    pub question_id: Option<i32>,
    pub subject_kind: SubjectKind,
    pub is_correct: Option<bool>,
    pub score: Option<i32>,
    pub total_questions: Option<i32>,
    pub status: ProgressStatus,
    pub recorded_at: NaiveDateTime,
    pub next_review_at: Option<NaiveDateTime>,
    pub attempt_number: i32,
}

impl NewAttempt {
    pub fn new(
        user_id: i32,
        input: &AttemptInput,
        status: ProgressStatus,
        recorded_at: NaiveDateTime,
        next_review_at: Option<NaiveDateTime>,
        attempt_number: i32,
    ) -> Self {
        let (score, total_questions) = match input.outcome {
            Outcome::Scored { score, total } => (Some(score), Some(total)),
            Outcome::Answered { .. } => (None, None),
        };
        Self {
            user_id,
            word_id: input.subject.word_id(),
            question_id: input.subject.question_id(),
            subject_kind: input.subject.kind(),
            is_correct: input.outcome.correct(),
            score,
            total_questions,
            status,
            recorded_at,
            next_review_at,
            attempt_number,
        }
    }
}

/// Validated attempt, ready for the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptInput {
    pub subject: Subject,
    pub outcome: Outcome,
    pub status: Option<ProgressStatus>,
}

/// Body of POST /api/progress. Any client supplied review date is ignored;
/// the scheduler decides it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttemptRequest {
    pub word_id: Option<i32>,
    pub question_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<SubjectKind>,
    pub is_correct: Option<bool>,
    pub score: Option<i32>,
    pub total_questions: Option<i32>,
    pub status: Option<ProgressStatus>,
}

impl RecordAttemptRequest {
    pub fn into_input(self) -> Result<AttemptInput, ApiError> {
        let kind = match (self.kind, self.word_id, self.question_id) {
            (Some(kind), _, _) => kind,
            (None, Some(_), None) => SubjectKind::Vocabulary,
            (None, None, Some(_)) => SubjectKind::Sentence,
            (None, Some(_), Some(_)) => {
                return Err(ApiError::Validation(
                    "Only one of wordId or questionId may be set".into(),
                ));
            }
            (None, None, None) => {
                return Err(ApiError::Validation("wordId or questionId is required".into()));
            }
        };

        let subject = match (kind, self.word_id, self.question_id) {
            (SubjectKind::Vocabulary, Some(word_id), None) => Subject::Vocabulary { word_id },
            (SubjectKind::Sentence, None, Some(question_id)) => Subject::Sentence { question_id },
            (SubjectKind::Simulation, None, None) => Subject::Simulation,
            (SubjectKind::Vocabulary, _, _) => {
                return Err(ApiError::Validation("Vocabulary attempts need only a wordId".into()));
            }
            (SubjectKind::Sentence, _, _) => {
                return Err(ApiError::Validation("Sentence attempts need only a questionId".into()));
            }
            (SubjectKind::Simulation, _, _) => {
                return Err(ApiError::Validation("Simulation attempts take no subject id".into()));
            }
        };

        let outcome = match subject {
            Subject::Simulation => match (self.score, self.total_questions) {
                (Some(score), Some(total)) if total > 0 && (0..=total).contains(&score) => {
                    Outcome::Scored { score, total }
                }
                (Some(_), Some(_)) => {
                    return Err(ApiError::Validation(
                        "score must be between 0 and totalQuestions".into(),
                    ));
                }
                _ => {
                    return Err(ApiError::Validation(
                        "score and totalQuestions are required".into(),
                    ));
                }
            },
            _ => match self.is_correct {
                Some(correct) => Outcome::Answered { correct },
                None => return Err(ApiError::Validation("isCorrect is required".into())),
            },
        };

        Ok(AttemptInput {
            subject,
            outcome,
            status: self.status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPractice {
    pub date: NaiveDate,
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_words: i64,
    pub learned_words: u32,
    pub in_progress_words: u32,
    pub average_score: u32,
    pub streak: u32,
    pub last_practice_date: Option<NaiveDateTime>,
    pub practice_history: Vec<DailyPractice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<AttemptInput, ApiError> {
        serde_json::from_str::<RecordAttemptRequest>(body).unwrap().into_input()
    }

    #[test]
    fn word_id_implies_vocabulary() {
        let input = parse(r#"{"wordId": 3, "isCorrect": true}"#).unwrap();
        assert_eq!(input.subject, Subject::Vocabulary { word_id: 3 });
        assert_eq!(input.outcome, Outcome::Answered { correct: true });
    }

    #[test]
    fn both_references_are_rejected() {
        let err = parse(r#"{"wordId": 3, "questionId": 4, "isCorrect": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn sentence_type_with_word_id_is_rejected() {
        let err = parse(r#"{"type": "sentence", "wordId": 3, "isCorrect": false}"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn simulation_needs_a_score_in_range() {
        let input = parse(r#"{"type": "simulation", "score": 7, "totalQuestions": 10}"#).unwrap();
        assert_eq!(input.subject, Subject::Simulation);
        assert_eq!(input.outcome.correct(), None);

        assert!(parse(r#"{"type": "simulation", "score": 11, "totalQuestions": 10}"#).is_err());
        assert!(parse(r#"{"type": "simulation"}"#).is_err());
    }

    #[test]
    fn missing_correctness_is_rejected() {
        assert!(parse(r#"{"questionId": 2}"#).is_err());
    }

    #[test]
    fn record_serializes_flat_subject_and_outcome() {
        let record = AttemptRecord {
            id: 1,
            user_id: 9,
            subject: Subject::Vocabulary { word_id: 4 },
            outcome: Outcome::Answered { correct: true },
            status: ProgressStatus::Learned,
            recorded_at: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            next_review_at: None,
            attempt_number: 1,
            review_count: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "vocabulary");
        assert_eq!(json["wordId"], 4);
        assert_eq!(json["isCorrect"], true);
        assert_eq!(json["status"], "learned");
        assert!(json.get("questionId").is_none());
    }

    #[test]
    fn inconsistent_row_is_an_internal_error() {
        let row = AttemptRow {
            attempt_id: 5,
            user_id: 1,
            word_id: Some(1),
            question_id: Some(2),
            subject_kind: SubjectKind::Vocabulary,
            is_correct: Some(true),
            score: None,
            total_questions: None,
            status: ProgressStatus::Learned,
            recorded_at: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            next_review_at: None,
            attempt_number: 1,
            review_count: 0,
        };
        assert!(matches!(AttemptRecord::try_from(row), Err(ApiError::Internal(_))));
    }
}
