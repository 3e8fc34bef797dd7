#![forbid(unsafe_code)]

pub mod error;
pub mod lesson_service;
pub mod practice_service;
pub mod quiz;

pub use error::{ErrorKind, LessonError, PracticeError, QuizError};
pub use lesson_service::LessonService;
pub use practice_service::PracticeService;

pub use quiz::{
    Answer, AnswerAttempt, Feedback, QuestionRecord, QuestionState, QuizProgress, QuizService,
    QuizSession, QuizSummary, SessionPhase, SubmittedAnswer,
};
