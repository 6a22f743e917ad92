use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;

use crate::data::models::{Difficulty, WordItem};

const DISTRACTORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub word_id: i32,
    pub english: String,
}

impl From<&WordItem> for QuizOption {
    fn from(word: &WordItem) -> Self {
        Self { word_id: word.word_id, english: word.english.clone() }
    }
}

/// One question: pick the English word for the Hebrew prompt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub word_id: i32,
    pub prompt: String,
    pub example: String,
    pub options: Vec<QuizOption>,
    pub answer_id: i32,
}

/// Lazily builds questions from the catalog. Subjects are drawn without
/// replacement, so the deck is finite and cannot be restarted.
pub struct QuestionDeck<'a, R: Rng> {
    catalog: &'a [WordItem],
    subjects: std::vec::IntoIter<usize>,
    rng: R,
}

impl<'a, R: Rng> QuestionDeck<'a, R> {
    pub fn new(
        catalog: &'a [WordItem],
        difficulty: Option<Difficulty>,
        category: Option<&str>,
        count: usize,
        mut rng: R,
    ) -> Self {
        let mut eligible: Vec<usize> = catalog
            .iter()
            .enumerate()
            .filter(|(_, w)| difficulty.is_none_or(|d| w.difficulty == d))
            .filter(|(_, w)| category.is_none_or(|c| w.category == c))
            .map(|(i, _)| i)
            .collect();
        eligible.shuffle(&mut rng);
        eligible.truncate(count);

        Self {
            catalog,
            subjects: eligible.into_iter(),
            rng,
        }
    }
}

impl<R: Rng> Iterator for QuestionDeck<'_, R> {
    type Item = QuizQuestion;

    fn next(&mut self) -> Option<QuizQuestion> {
        let subject = &self.catalog[self.subjects.next()?];

        let others: Vec<&WordItem> = self
            .catalog
            .iter()
            .filter(|w| w.word_id != subject.word_id)
            .collect();
        let mut options: Vec<QuizOption> = others
            .choose_multiple(&mut self.rng, DISTRACTORS)
            .map(|w| QuizOption::from(*w))
            .collect();
        options.push(QuizOption::from(subject));
        options.shuffle(&mut self.rng);

        Some(QuizQuestion {
            word_id: subject.word_id,
            prompt: subject.hebrew.clone(),
            example: subject.example.clone(),
            options,
            answer_id: subject.word_id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.subjects.size_hint()
    }
}

impl<R: Rng> ExactSizeIterator for QuestionDeck<'_, R> {}
