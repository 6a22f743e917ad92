use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::SimulationConfig;
use crate::features::errors::ApiError;
use crate::schema::simulation_runs;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = simulation_runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SimulationRunRow {
    pub run_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub total_questions: i32,
    pub answers: String,
    pub time_spent: i32,
    pub completed_at: NaiveDateTime,
}

/// One finished timed exam
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    pub id: i32,
    pub user_id: i32,
    pub score: i32,
    pub total_questions: i32,
    pub answers: BTreeMap<String, i32>,
    pub time_spent: i32,
    pub completed_at: NaiveDateTime,
}

impl TryFrom<SimulationRunRow> for SimulationRun {
    type Error = ApiError;

    fn try_from(row: SimulationRunRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.run_id,
            user_id: row.user_id,
            score: row.score,
            total_questions: row.total_questions,
            answers: serde_json::from_str(&row.answers)?,
            time_spent: row.time_spent,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = simulation_runs)]
pub struct NewSimulationRun {
    pub user_id: i32,
    pub score: i32,
    pub total_questions: i32,
    pub answers: String,
    pub time_spent: i32,
    pub completed_at: NaiveDateTime,
}

/// Body of POST /api/simulation-progress. `answers` maps question number to
/// the chosen option number.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 1, message = "totalQuestions must be positive"))]
    pub total_questions: i32,
    #[serde(default)]
    pub answers: BTreeMap<String, i32>,
    #[validate(range(min = 0, message = "timeSpent cannot be negative"))]
    pub time_spent: i32,
}

impl SimulationRequest {
    /// Field rules plus the ones that depend on the exam settings
    pub fn check(&self, config: &SimulationConfig) -> Result<(), ApiError> {
        self.validate()?;
        if self.score > self.total_questions {
            return Err(ApiError::Validation("score cannot exceed totalQuestions".into()));
        }
        if self.time_spent > config.time_limit_secs {
            return Err(ApiError::Validation(format!(
                "timeSpent cannot exceed the {} second time limit",
                config.time_limit_secs
            )));
        }
        for (question, choice) in &self.answers {
            let in_exam = question
                .parse::<i32>()
                .is_ok_and(|number| (1..=self.total_questions).contains(&number));
            if !in_exam {
                return Err(ApiError::Validation(format!(
                    "{} is not a question of this exam",
                    question
                )));
            }
            if !(1..=config.answer_count).contains(choice) {
                let message = format!("answer {} is not a valid option", choice);
                return Err(ApiError::Validation(message));
            }
        }
        Ok(())
    }
}
