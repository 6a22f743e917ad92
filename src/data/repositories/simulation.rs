use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{NewSimulationRun, SimulationRequest, SimulationRun, SimulationRunRow};
use crate::db::last_insert_id;
use crate::features::errors::ApiError;
use crate::schema::simulation_runs;

pub struct SimulationRepository;

impl SimulationRepository {
    pub fn insert(
        conn: &mut SqliteConnection,
        user_id: i32,
        request: &SimulationRequest,
        now: NaiveDateTime,
    ) -> Result<SimulationRun, ApiError> {
        diesel::insert_into(simulation_runs::table)
            .values(NewSimulationRun {
                user_id,
                score: request.score,
                total_questions: request.total_questions,
                answers: serde_json::to_string(&request.answers)?,
                time_spent: request.time_spent,
                completed_at: now,
            })
            .execute(conn)?;
        let run_id = last_insert_id(conn)?;

        let row = simulation_runs::table
            .find(run_id)
            .select(SimulationRunRow::as_select())
            .first(conn)?;
        SimulationRun::try_from(row)
    }

    /// Finished runs of one learner, latest first
    pub fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<SimulationRun>, ApiError> {
        simulation_runs::table
            .filter(simulation_runs::user_id.eq(user_id))
            .order((simulation_runs::completed_at.desc(), simulation_runs::run_id.desc()))
            .select(SimulationRunRow::as_select())
            .load(conn)?
            .into_iter()
            .map(SimulationRun::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::UserRepository;
    use crate::db::test_pool;
    use chrono::{Duration, NaiveDate};
    use std::collections::BTreeMap;

    #[test]
    fn runs_are_listed_latest_first_with_answers() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let user = UserRepository::create_user(&mut conn, "sim@example.com", "Sim", "password1", 4)
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();

        let mut answers = BTreeMap::new();
        answers.insert("1".to_string(), 3);
        answers.insert("2".to_string(), 1);
        let first = SimulationRequest { score: 12, total_questions: 20, answers, time_spent: 1800 };
        let second = SimulationRequest { score: 15, answers: BTreeMap::new(), ..first.clone() };

        SimulationRepository::insert(&mut conn, user.user_id, &first, start).unwrap();
        let next_day = start + Duration::days(1);
        SimulationRepository::insert(&mut conn, user.user_id, &second, next_day).unwrap();

        let runs = SimulationRepository::list_for_user(&mut conn, user.user_id).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].score, 15);
        assert_eq!(runs[1].answers.get("1"), Some(&3));
        let stranger = SimulationRepository::list_for_user(&mut conn, user.user_id + 1).unwrap();
        assert!(stranger.is_empty());
    }
}
