use std::collections::BTreeSet;

use super::{AnswerError, Verdict, check_option};

/// Outcome of selecting an option on a single-blank question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceAttempt {
    pub verdict: Verdict,
    /// The option was already disabled; nothing changed.
    pub repeated: bool,
}

/// Validator state for multiple-choice and fill-blank questions.
///
/// Wrong options stay disabled until [`ChoiceState::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceState {
    option_count: usize,
    correct: usize,
    disabled: BTreeSet<usize>,
    selected: Option<usize>,
    resolved: bool,
}

impl ChoiceState {
    #[must_use]
    pub fn new(option_count: usize, correct: usize) -> Self {
        Self {
            option_count,
            correct,
            disabled: BTreeSet::new(),
            selected: None,
            resolved: false,
        }
    }

    /// Select an option.
    ///
    /// Selecting a disabled option returns the earlier incorrect verdict
    /// without counting as a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::AlreadyResolved` once the correct option was chosen,
    /// or `AnswerError::OptionOutOfRange` for an index past the option list.
    pub fn select(&mut self, index: usize) -> Result<ChoiceAttempt, AnswerError> {
        if self.resolved {
            return Err(AnswerError::AlreadyResolved);
        }
        let verdict = check_option(self.option_count, self.correct, index)?;
        if self.disabled.contains(&index) {
            return Ok(ChoiceAttempt {
                verdict: Verdict::Incorrect,
                repeated: true,
            });
        }

        self.selected = Some(index);
        match verdict {
            Verdict::Correct => self.resolved = true,
            Verdict::Incorrect => {
                self.disabled.insert(index);
            }
        }
        Ok(ChoiceAttempt {
            verdict,
            repeated: false,
        })
    }

    #[must_use]
    pub fn is_disabled(&self, index: usize) -> bool {
        self.disabled.contains(&index)
    }

    /// Disabled option indices in ascending order.
    pub fn disabled(&self) -> impl Iterator<Item = usize> + '_ {
        self.disabled.iter().copied()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn reset(&mut self) {
        self.disabled.clear();
        self.selected = None;
        self.resolved = false;
    }
}
