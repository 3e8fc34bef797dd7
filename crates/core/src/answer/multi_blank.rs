use std::collections::BTreeSet;

use super::{AnswerError, Verdict, check_option};
use crate::model::{BLANK_MARKER, MultiBlankQuestion};

/// Outcome of selecting an option for the blank under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlankOutcome {
    /// The blank was filled and the cursor moved on to `next`.
    Filled { blank: usize, next: usize },
    /// The last blank was filled; every answer is recorded in order.
    Completed { answers: Vec<usize> },
    /// Wrong option for `blank`; the cursor did not move.
    Incorrect { blank: usize, repeated: bool },
}

impl BlankOutcome {
    /// Correctness of the whole question; partial fills do not count.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self {
            BlankOutcome::Completed { .. } => Verdict::Correct,
            BlankOutcome::Filled { .. } | BlankOutcome::Incorrect { .. } => Verdict::Incorrect,
        }
    }
}

/// How one placeholder of the paragraph should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankDisplay<'q> {
    Filled(&'q str),
    Active,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlankKey {
    option_count: usize,
    correct: usize,
}

/// Sequential validator for a multi-blank paragraph.
///
/// Only the blank under the cursor accepts input. The disabled set belongs to
/// that blank and is cleared when the cursor advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiBlankState {
    keys: Vec<BlankKey>,
    cursor: usize,
    answers: Vec<Option<usize>>,
    disabled: BTreeSet<usize>,
}

impl MultiBlankState {
    #[must_use]
    pub fn new(question: &MultiBlankQuestion) -> Self {
        let keys: Vec<BlankKey> = question
            .blanks
            .iter()
            .map(|b| BlankKey {
                option_count: b.options.len(),
                correct: b.correct_answer_index,
            })
            .collect();
        let answers = vec![None; keys.len()];
        Self {
            keys,
            cursor: 0,
            answers,
            disabled: BTreeSet::new(),
        }
    }

    /// Select an option for the blank under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::AlreadyResolved` once every blank is filled, or
    /// `AnswerError::OptionOutOfRange` for an index past the blank's options.
    pub fn select(&mut self, option: usize) -> Result<BlankOutcome, AnswerError> {
        if self.is_complete() {
            return Err(AnswerError::AlreadyResolved);
        }
        let blank = self.cursor;
        let key = self.keys[blank];
        let verdict = check_option(key.option_count, key.correct, option)?;

        if self.disabled.contains(&option) {
            return Ok(BlankOutcome::Incorrect {
                blank,
                repeated: true,
            });
        }

        match verdict {
            Verdict::Correct => {
                self.answers[blank] = Some(option);
                if blank + 1 == self.keys.len() {
                    Ok(BlankOutcome::Completed {
                        answers: self.answers.iter().flatten().copied().collect(),
                    })
                } else {
                    self.cursor = blank + 1;
                    self.disabled.clear();
                    Ok(BlankOutcome::Filled {
                        blank,
                        next: self.cursor,
                    })
                }
            }
            Verdict::Incorrect => {
                self.disabled.insert(option);
                Ok(BlankOutcome::Incorrect {
                    blank,
                    repeated: false,
                })
            }
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.keys.len()
    }

    /// True iff no blank is left empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    /// Whether `option` is disabled for the blank under the cursor.
    #[must_use]
    pub fn is_disabled(&self, option: usize) -> bool {
        self.disabled.contains(&option)
    }

    pub fn disabled(&self) -> impl Iterator<Item = usize> + '_ {
        self.disabled.iter().copied()
    }

    /// Display state of every blank, in blank order.
    #[must_use]
    pub fn blank_displays<'q>(&self, question: &'q MultiBlankQuestion) -> Vec<BlankDisplay<'q>> {
        question
            .blanks
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(index, (blank, answer))| match answer {
                Some(option) => blank
                    .options
                    .get(*option)
                    .map_or(BlankDisplay::Empty, |text| BlankDisplay::Filled(text)),
                None if index == self.cursor => BlankDisplay::Active,
                None => BlankDisplay::Empty,
            })
            .collect()
    }

    /// Substitutes each placeholder left to right using `render`.
    pub fn render_paragraph<F>(&self, question: &MultiBlankQuestion, mut render: F) -> String
    where
        F: FnMut(BlankDisplay<'_>) -> String,
    {
        let mut paragraph = question.paragraph.clone();
        for (blank, display) in question.blanks.iter().zip(self.blank_displays(question)) {
            paragraph = paragraph.replacen(&blank.placeholder(), &render(display), 1);
        }
        paragraph
    }

    /// Plain-text paragraph: filled text, `[_____]` for the active blank and
    /// `_____` for the rest.
    #[must_use]
    pub fn display_paragraph(&self, question: &MultiBlankQuestion) -> String {
        self.render_paragraph(question, |display| match display {
            BlankDisplay::Filled(text) => text.to_string(),
            BlankDisplay::Active => format!("[{BLANK_MARKER}]"),
            BlankDisplay::Empty => BLANK_MARKER.to_string(),
        })
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.answers.iter_mut().for_each(|a| *a = None);
        self.disabled.clear();
    }
}
