use rand::Rng;

use lesson_core::answer::{
    BlankOutcome, ChoiceState, LineStatus, MultiBlankState, StoryState, Verdict,
};
use lesson_core::model::{Question, QuestionKind};

use crate::error::QuizError;

/// Input forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Option index for a single-blank question, or for the blank under the
    /// cursor of a multi-blank question.
    Option(usize),
    /// Full story ordering: the 1-based position of each displayed line.
    Order(Vec<usize>),
    /// Submit the story ordering built with `assign_position`.
    CurrentOrder,
}

impl Answer {
    fn name(&self) -> &'static str {
        match self {
            Answer::Option(_) => "option",
            Answer::Order(_) => "order",
            Answer::CurrentOrder => "current-order",
        }
    }
}

/// Correctness signal returned from a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// The question is now answered correctly; call `advance`.
    Correct,
    /// Wrong option. `repeated` means it was already disabled and nothing changed.
    Incorrect { repeated: bool },
    /// A multi-blank blank was filled; the question is not done yet.
    BlankFilled { blank: usize, next: usize },
    /// Wrong story ordering with per-line feedback in display order.
    OrderIncorrect { statuses: Vec<LineStatus> },
}

impl Feedback {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

/// What was submitted, as kept in the answer history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswer {
    Option(usize),
    Blank { blank: usize, option: usize },
    Sequence(Vec<usize>),
}

/// Per-question validator state, dispatched on question kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionState {
    Choice(ChoiceState),
    MultiBlank(MultiBlankState),
    Story(StoryState),
}

pub(crate) struct Submission {
    pub feedback: Feedback,
    /// `None` for repeated rejections, which leave no trace.
    pub record: Option<(SubmittedAnswer, Verdict)>,
}

impl QuestionState {
    /// Fresh state for a question. Story lines are shuffled with `rng`.
    pub fn for_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        match &question.kind {
            QuestionKind::MultipleChoice(q) => {
                QuestionState::Choice(ChoiceState::new(q.options.len(), q.correct_answer_index))
            }
            QuestionKind::FillBlank(q) => {
                QuestionState::Choice(ChoiceState::new(q.options.len(), q.correct_answer_index))
            }
            QuestionKind::MultipleBlanks(q) => QuestionState::MultiBlank(MultiBlankState::new(q)),
            QuestionKind::StorySequence(q) => {
                QuestionState::Story(StoryState::shuffled(&q.lines, rng))
            }
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            QuestionState::Choice(state) => state.is_resolved(),
            QuestionState::MultiBlank(state) => state.is_complete(),
            QuestionState::Story(state) => state.is_solved(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            QuestionState::Choice(_) => "single-choice",
            QuestionState::MultiBlank(_) => "multiple-blanks",
            QuestionState::Story(_) => "story-sequence",
        }
    }

    pub(crate) fn submit(&mut self, answer: Answer) -> Result<Submission, QuizError> {
        let mismatch = QuizError::AnswerMismatch {
            kind: self.kind_name(),
            answer: answer.name(),
        };
        match (self, answer) {
            (QuestionState::Choice(state), Answer::Option(index)) => {
                let attempt = state.select(index)?;
                Ok(Submission {
                    feedback: match attempt.verdict {
                        Verdict::Correct => Feedback::Correct,
                        Verdict::Incorrect => Feedback::Incorrect {
                            repeated: attempt.repeated,
                        },
                    },
                    record: (!attempt.repeated)
                        .then_some((SubmittedAnswer::Option(index), attempt.verdict)),
                })
            }
            (QuestionState::MultiBlank(state), Answer::Option(option)) => {
                let blank = state.cursor();
                let outcome = state.select(option)?;
                let submitted = SubmittedAnswer::Blank { blank, option };
                Ok(match outcome {
                    BlankOutcome::Completed { answers } => Submission {
                        feedback: Feedback::Correct,
                        record: Some((SubmittedAnswer::Sequence(answers), Verdict::Correct)),
                    },
                    BlankOutcome::Filled { blank, next } => Submission {
                        feedback: Feedback::BlankFilled { blank, next },
                        record: Some((submitted, Verdict::Correct)),
                    },
                    BlankOutcome::Incorrect { repeated, .. } => Submission {
                        feedback: Feedback::Incorrect { repeated },
                        record: (!repeated).then_some((submitted, Verdict::Incorrect)),
                    },
                })
            }
            (QuestionState::Story(state), Answer::Order(positions)) => {
                apply_order(state, &positions)?;
                submit_story(state)
            }
            (QuestionState::Story(state), Answer::CurrentOrder) => submit_story(state),
            _ => Err(mismatch),
        }
    }
}

/// Applies a full ordering, rejecting anything that is not a permutation of
/// `1..=n` before touching the state.
fn apply_order(state: &mut StoryState, positions: &[usize]) -> Result<(), QuizError> {
    use lesson_core::answer::AnswerError;

    let len = state.lines().len();
    let mut seen = vec![false; len];
    if positions.len() != len {
        return Err(AnswerError::InvalidOrder { len }.into());
    }
    for &position in positions {
        match position.checked_sub(1).and_then(|slot| seen.get_mut(slot)) {
            Some(taken) if !*taken => *taken = true,
            _ => return Err(AnswerError::InvalidOrder { len }.into()),
        }
    }
    for (line, &position) in positions.iter().enumerate() {
        state.assign(line, Some(position))?;
    }
    Ok(())
}

fn submit_story(state: &mut StoryState) -> Result<Submission, QuizError> {
    let submission = state.submit()?;
    let feedback = match submission.verdict {
        Verdict::Correct => Feedback::Correct,
        Verdict::Incorrect => Feedback::OrderIncorrect {
            statuses: submission.statuses,
        },
    };
    Ok(Submission {
        feedback,
        record: Some((SubmittedAnswer::Sequence(submission.sequence), submission.verdict)),
    })
}
