//! Starter content inserted when the catalog tables are empty.

use crate::data::models::{NewSentenceQuestion, NewWordRequest};

const WORDS: &str = include_str!("../../seed/words.json");
const SENTENCE_QUESTIONS: &str = include_str!("../../seed/sentence_questions.json");

pub fn words() -> Result<Vec<NewWordRequest>, serde_json::Error> {
    serde_json::from_str(WORDS)
}

pub fn sentence_questions() -> Result<Vec<NewSentenceQuestion>, serde_json::Error> {
    serde_json::from_str(SENTENCE_QUESTIONS)
}
