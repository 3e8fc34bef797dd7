//! Shared error types for the services crate.

use thiserror::Error;

use content::ContentError;
use lesson_core::answer::AnswerError;
use lesson_core::model::{LessonId, QuestionError};

/// Contract-violation category of a [`QuizError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or empty question set, or an out-of-range index.
    InvalidInput,
    /// Operation not allowed in the current session state.
    InvalidState,
}

/// Errors emitted by the quiz session and quiz service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error("{answer} answer does not fit a {kind} question")]
    AnswerMismatch {
        kind: &'static str,
        answer: &'static str,
    },
    #[error("current question has not been answered correctly")]
    NotAnswered,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is not complete yet")]
    NotComplete,
}

impl QuizError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::Empty | QuizError::Question(_) | QuizError::AnswerMismatch { .. } => {
                ErrorKind::InvalidInput
            }
            QuizError::Answer(err) => match err {
                AnswerError::Unassigned | AnswerError::AlreadyResolved => ErrorKind::InvalidState,
                _ => ErrorKind::InvalidInput,
            },
            QuizError::NotAnswered | QuizError::Completed | QuizError::NotComplete => {
                ErrorKind::InvalidState
            }
        }
    }
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson not found: {0}")]
    NotFound(LessonId),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(transparent)]
    Progress(#[from] ContentError),
}
