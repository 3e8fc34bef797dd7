use std::sync::Arc;

use rand::rngs::StdRng;

use content::ContentStore;
use lesson_core::model::{Level, Quiz};

use super::session::QuizSession;
use crate::error::QuizError;

/// Entry shown in a level's quiz list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub level: Level,
    pub number: u32,
    pub title: String,
    pub question_count: usize,
}

/// Loads quizzes through the content store and starts sessions over them.
#[derive(Clone)]
pub struct QuizService {
    store: Arc<ContentStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    /// Quizzes available for a level, in quiz-number order.
    pub async fn available(&self, level: Level) -> Vec<QuizSummary> {
        self.store
            .quizzes(level)
            .await
            .into_iter()
            .map(|quiz| QuizSummary {
                level: quiz.level,
                number: quiz.number,
                title: quiz.title,
                question_count: quiz.questions.len(),
            })
            .collect()
    }

    /// Load a quiz and start a session over its questions.
    ///
    /// A missing or unreadable quiz loads as empty.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for a missing or empty quiz, or
    /// `QuizError::Question` for malformed questions.
    pub async fn start(&self, level: Level, number: u32) -> Result<QuizSession, QuizError> {
        let quiz = self.load(level, number).await;
        let session = QuizSession::start(quiz.questions)?;
        log::info!(
            "[QUIZ] started level:{level} quiz:{number} questions:{}",
            session.total()
        );
        Ok(session)
    }

    /// Like [`QuizService::start`], with a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// Same as [`QuizService::start`].
    pub async fn start_with_rng(
        &self,
        level: Level,
        number: u32,
        rng: StdRng,
    ) -> Result<QuizSession, QuizError> {
        let quiz = self.load(level, number).await;
        QuizSession::start_with_rng(quiz.questions, rng)
    }

    async fn load(&self, level: Level, number: u32) -> Quiz {
        match self.store.quiz(level, number).await {
            Some(quiz) => quiz,
            None => {
                log::warn!("[QUIZ] unavailable level:{level} quiz:{number}");
                Quiz {
                    level,
                    number,
                    title: String::new(),
                    description: None,
                    questions: Vec::new(),
                }
            }
        }
    }
}
