use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::unseen_models::{NewPassageRow, NewUnseenOptionRow, NewUnseenQuestionRow};
use crate::data::models::{
    NewPassageRequest, PassageOption, PassageRow, UnseenOptionRow, UnseenPassage, UnseenQuestion,
    UnseenQuestionRow,
};
use crate::db::last_insert_id;
use crate::schema::{unseen_options, unseen_passages, unseen_questions};

pub struct PassageRepository;

impl PassageRepository {
    /// Newest passages first
    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<UnseenPassage>> {
        let passages = unseen_passages::table
            .order((unseen_passages::created_at.desc(), unseen_passages::passage_id.desc()))
            .select(PassageRow::as_select())
            .load(conn)?;
        Self::assemble(conn, passages)
    }

    pub fn find(
        conn: &mut SqliteConnection,
        passage_id: i32,
    ) -> QueryResult<Option<UnseenPassage>> {
        let passage = unseen_passages::table
            .find(passage_id)
            .select(PassageRow::as_select())
            .first(conn)
            .optional()?;
        match passage {
            Some(passage) => Ok(Self::assemble(conn, vec![passage])?.pop()),
            None => Ok(None),
        }
    }

    pub fn insert(
        conn: &mut SqliteConnection,
        request: &NewPassageRequest,
        now: NaiveDateTime,
    ) -> QueryResult<Option<UnseenPassage>> {
        conn.transaction(|conn| {
            diesel::insert_into(unseen_passages::table)
                .values(NewPassageRow { passage: request.passage.trim(), created_at: now })
                .execute(conn)?;
            let passage_id = last_insert_id(conn)?;

            for (position, question) in request.questions.iter().enumerate() {
                diesel::insert_into(unseen_questions::table)
                    .values(NewUnseenQuestionRow {
                        passage_id,
                        position: position as i32,
                        prompt: question.question.trim(),
                        answer: question.answer.trim(),
                    })
                    .execute(conn)?;
                let question_id = last_insert_id(conn)?;

                let options: Vec<NewUnseenOptionRow> = question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(position, option)| NewUnseenOptionRow {
                        question_id,
                        position: position as i32,
                        text: option.text.trim(),
                        value: option.value.trim(),
                    })
                    .collect();
                diesel::insert_into(unseen_options::table)
                    .values(&options)
                    .execute(conn)?;
            }

            Self::find(conn, passage_id)
        })
    }

    fn assemble(
        conn: &mut SqliteConnection,
        passages: Vec<PassageRow>,
    ) -> QueryResult<Vec<UnseenPassage>> {
        let passage_ids: Vec<i32> = passages.iter().map(|p| p.passage_id).collect();
        let questions = unseen_questions::table
            .filter(unseen_questions::passage_id.eq_any(&passage_ids))
            .order((unseen_questions::passage_id.asc(), unseen_questions::position.asc()))
            .select(UnseenQuestionRow::as_select())
            .load(conn)?;

        let question_ids: Vec<i32> = questions.iter().map(|q| q.question_id).collect();
        let mut options: HashMap<i32, Vec<PassageOption>> = HashMap::new();
        for row in unseen_options::table
            .filter(unseen_options::question_id.eq_any(&question_ids))
            .order((unseen_options::question_id.asc(), unseen_options::position.asc()))
            .select(UnseenOptionRow::as_select())
            .load(conn)?
        {
            options
                .entry(row.question_id)
                .or_default()
                .push(PassageOption { text: row.text, value: row.value });
        }

        let mut by_passage: HashMap<i32, Vec<UnseenQuestion>> = HashMap::new();
        for row in questions {
            by_passage.entry(row.passage_id).or_default().push(UnseenQuestion {
                id: row.question_id,
                prompt: row.prompt,
                options: options.remove(&row.question_id).unwrap_or_default(),
                answer: row.answer,
            });
        }

        Ok(passages
            .into_iter()
            .map(|p| UnseenPassage {
                id: p.passage_id,
                questions: by_passage.remove(&p.passage_id).unwrap_or_default(),
                passage: p.passage,
            })
            .collect())
    }
}
