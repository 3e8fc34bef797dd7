//! Answer validation for each question kind.
//!
//! Every validator is a small state object owned by whoever presents the
//! question. Transitions are synchronous and never model time.

mod choice;
mod multi_blank;
mod story;

use thiserror::Error;

pub use choice::{ChoiceAttempt, ChoiceState};
pub use multi_blank::{BlankDisplay, BlankOutcome, MultiBlankState};
pub use story::{LineStatus, StoryLine, StoryState, StorySubmission};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("line {index} is out of range for {len} lines")]
    LineOutOfRange { index: usize, len: usize },

    #[error("position {position} is out of range 1..={len}")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("display order is not a permutation of {len} lines")]
    InvalidOrder { len: usize },

    #[error("every line needs a position before submitting")]
    Unassigned,

    #[error("question is already answered correctly")]
    AlreadyResolved,
}

/// Correctness signal for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Checks a single option index against the correct one.
///
/// # Errors
///
/// Returns `AnswerError::OptionOutOfRange` if `index >= option_count`.
pub fn check_option(option_count: usize, correct: usize, index: usize) -> Result<Verdict, AnswerError> {
    if index >= option_count {
        return Err(AnswerError::OptionOutOfRange {
            index,
            len: option_count,
        });
    }
    Ok(if index == correct {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    })
}
