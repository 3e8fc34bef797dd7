mod progress;
mod service;
mod session;
mod state;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use service::{QuizService, QuizSummary};
pub use session::{AnswerAttempt, QuestionRecord, QuizSession, SessionPhase};
pub use state::{Answer, Feedback, QuestionState, SubmittedAnswer};
