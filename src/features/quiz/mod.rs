//! Timed multiple-choice quiz over the word catalog.

mod deck;
mod session;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

pub use deck::{QuestionDeck, QuizOption, QuizQuestion};
pub use session::{QuizConfig, QuizError, QuizMode, QuizSession, QuizState, QuizView};

/// A quiz whose questions were drawn up front
pub type ActiveQuiz = QuizSession<std::vec::IntoIter<QuizQuestion>>;

/// Running quizzes, one per learner
pub type QuizStore = Arc<Mutex<HashMap<i32, ActiveQuiz>>>;
