use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{QuizOption, QuizQuestion};
use crate::data::models::Difficulty;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Practice,
    Review,
}

impl QuizMode {
    /// Seconds the result stays on screen before the next question
    pub fn result_delay(self) -> u32 {
        match self {
            QuizMode::Practice => 3,
            QuizMode::Review => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub question_count: usize,
    pub seconds_per_question: u32,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub mode: QuizMode,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 10,
            seconds_per_question: 30,
            difficulty: None,
            category: None,
            mode: QuizMode::Practice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QuizState {
    Configuring,
    InQuestion { index: usize, time_left: u32 },
    ShowingResult { index: usize, correct: bool, delay_left: u32 },
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("the quiz has already started")]
    AlreadyStarted,
    #[error("no question is waiting for an answer")]
    NotAnswering,
    #[error("no words match the quiz filters")]
    NoQuestions,
}

/// The current question as a learner sees it. The right option stays hidden
/// until the result is showing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPrompt {
    pub prompt: String,
    pub example: String,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub mode: QuizMode,
    pub state: QuizState,
    pub question: Option<QuizPrompt>,
    pub answered: usize,
    pub correct_answers: usize,
    pub score: u32,
}

/// Drives one quiz run. Time only moves when the owner calls [`tick`],
/// once per second.
///
/// [`tick`]: QuizSession::tick
pub struct QuizSession<D> {
    config: QuizConfig,
    deck: D,
    current: Option<QuizQuestion>,
    state: QuizState,
    answered: usize,
    correct: usize,
}

impl<D> QuizSession<D>
where
    D: Iterator<Item = QuizQuestion>,
{
    pub fn new(config: QuizConfig, deck: D) -> Self {
        Self {
            config,
            deck,
            current: None,
            state: QuizState::Configuring,
            answered: 0,
            correct: 0,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current.as_ref()
    }

    pub fn start(&mut self) -> Result<&QuizQuestion, QuizError> {
        if self.state != QuizState::Configuring {
            return Err(QuizError::AlreadyStarted);
        }
        self.advance(0);
        self.current.as_ref().ok_or(QuizError::NoQuestions)
    }

    /// Answers the current question; `None` is a timeout. Returns whether the
    /// answer was right.
    pub fn answer(&mut self, option: Option<i32>) -> Result<bool, QuizError> {
        let QuizState::InQuestion { index, .. } = self.state else {
            return Err(QuizError::NotAnswering);
        };
        let question = self.current.as_ref().ok_or(QuizError::NotAnswering)?;

        let correct = option == Some(question.answer_id);
        self.show_result(index, correct);
        Ok(correct)
    }

    fn show_result(&mut self, index: usize, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        self.state = QuizState::ShowingResult {
            index,
            correct,
            delay_left: self.config.mode.result_delay(),
        };
    }

    /// One second passes
    pub fn tick(&mut self) -> QuizState {
        match self.state {
            QuizState::InQuestion { index, time_left } if time_left > 1 => {
                self.state = QuizState::InQuestion { index, time_left: time_left - 1 };
            }
            QuizState::InQuestion { index, .. } => self.show_result(index, false),
            QuizState::ShowingResult { index, correct, delay_left } if delay_left > 1 => {
                self.state =
                    QuizState::ShowingResult { index, correct, delay_left: delay_left - 1 };
            }
            QuizState::ShowingResult { index, .. } => self.advance(index + 1),
            QuizState::Configuring | QuizState::Complete => {}
        }
        self.state
    }

    fn advance(&mut self, index: usize) {
        self.current = self.deck.next();
        self.state = match self.current {
            Some(_) => QuizState::InQuestion { index, time_left: self.config.seconds_per_question },
            None => QuizState::Complete,
        };
    }

    /// Snapshot for the client
    pub fn view(&self) -> QuizView {
        let revealed = matches!(self.state, QuizState::ShowingResult { .. });
        QuizView {
            mode: self.config.mode,
            state: self.state,
            question: self.current.as_ref().map(|q| QuizPrompt {
                prompt: q.prompt.clone(),
                example: q.example.clone(),
                options: q.options.clone(),
                answer_id: revealed.then_some(q.answer_id),
            }),
            answered: self.answered,
            correct_answers: self.correct,
            score: self.score(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == QuizState::Complete
    }

    /// Percentage of answered questions that were right
    pub fn score(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        ((self.correct as f64) * 100.0 / (self.answered as f64)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i32) -> QuizQuestion {
        QuizQuestion {
            word_id: id,
            prompt: format!("שאלה {id}"),
            example: String::new(),
            options: vec![
                QuizOption { word_id: id, english: format!("w{id}") },
                QuizOption { word_id: id + 100, english: "other".into() },
            ],
            answer_id: id,
        }
    }

    fn session(n: i32, mode: QuizMode) -> QuizSession<std::vec::IntoIter<QuizQuestion>> {
        let config = QuizConfig { seconds_per_question: 3, mode, ..QuizConfig::default() };
        QuizSession::new(config, (1..=n).map(question).collect::<Vec<_>>().into_iter())
    }

    #[test]
    fn answering_moves_through_result_to_next_question() {
        let mut quiz = session(2, QuizMode::Practice);
        assert_eq!(quiz.state(), QuizState::Configuring);
        assert_eq!(quiz.start().unwrap().word_id, 1);

        assert_eq!(quiz.answer(Some(1)), Ok(true));
        let showing = QuizState::ShowingResult { index: 0, correct: true, delay_left: 3 };
        assert_eq!(quiz.state(), showing);
        assert_eq!(quiz.answer(Some(1)), Err(QuizError::NotAnswering));

        quiz.tick();
        quiz.tick();
        assert_eq!(quiz.tick(), QuizState::InQuestion { index: 1, time_left: 3 });
        assert_eq!(quiz.current_question().unwrap().word_id, 2);

        assert_eq!(quiz.answer(Some(999)), Ok(false));
        quiz.tick();
        quiz.tick();
        quiz.tick();
        assert!(quiz.is_complete());
        assert_eq!(quiz.score(), 50);
    }

    #[test]
    fn timeout_counts_as_incorrect() {
        let mut quiz = session(1, QuizMode::Review);
        quiz.start().unwrap();
        quiz.tick();
        quiz.tick();
        let timed_out = QuizState::ShowingResult { index: 0, correct: false, delay_left: 2 };
        assert_eq!(quiz.tick(), timed_out);
        quiz.tick();
        assert_eq!(quiz.tick(), QuizState::Complete);
        assert_eq!(quiz.view().correct_answers, 0);
        assert_eq!(quiz.score(), 0);
    }

    #[test]
    fn empty_deck_completes_immediately() {
        let mut quiz = session(0, QuizMode::Practice);
        assert_eq!(quiz.start().unwrap_err(), QuizError::NoQuestions);
        assert!(quiz.is_complete());
        assert_eq!(quiz.tick(), QuizState::Complete);
    }

    #[test]
    fn view_hides_the_answer_until_the_result_shows() {
        let mut quiz = session(1, QuizMode::Practice);
        quiz.start().unwrap();
        let asking = serde_json::to_value(quiz.view()).unwrap();
        assert_eq!(asking["state"]["phase"], "inQuestion");
        assert_eq!(asking["state"]["timeLeft"], 3);
        assert!(asking["question"].get("answerId").is_none());

        quiz.answer(Some(1)).unwrap();
        let showing = serde_json::to_value(quiz.view()).unwrap();
        assert_eq!(showing["state"]["phase"], "showingResult");
        assert_eq!(showing["question"]["answerId"], 1);
        assert_eq!(showing["score"], 100);
    }

    #[test]
    fn a_session_starts_once() {
        let mut quiz = session(1, QuizMode::Practice);
        quiz.start().unwrap();
        assert_eq!(quiz.start().unwrap_err(), QuizError::AlreadyStarted);
    }
}
