use rand::Rng;
use rand::seq::SliceRandom;

use super::{AnswerError, Verdict};

/// A story line as shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryLine {
    pub text: String,
    /// Index of this line in the canonical story.
    pub original_index: usize,
    /// User-assigned 1-based position.
    pub position: Option<usize>,
}

impl StoryLine {
    fn status(&self) -> LineStatus {
        match self.position {
            None => LineStatus::Pending,
            Some(position) if position - 1 == self.original_index => LineStatus::Correct,
            Some(_) => LineStatus::Incorrect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    Correct,
    Incorrect,
    /// No feedback yet, or the line has no position.
    Pending,
}

/// Result of checking the learner's ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySubmission {
    pub verdict: Verdict,
    /// `sequence[p]` is the original index of the line placed at position `p + 1`.
    pub sequence: Vec<usize>,
    /// Per-line feedback in display order.
    pub statuses: Vec<LineStatus>,
}

/// Validator for story-sequence questions.
///
/// At most one line holds any position: assigning a taken position vacates
/// the previous holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryState {
    lines: Vec<StoryLine>,
    feedback: bool,
    solved: bool,
}

impl StoryState {
    /// Lines displayed in canonical order.
    #[must_use]
    pub fn new(lines: &[String]) -> Self {
        let order: Vec<usize> = (0..lines.len()).collect();
        Self::build(lines, &order)
    }

    /// Lines displayed in a uniformly shuffled order.
    pub fn shuffled<R: Rng + ?Sized>(lines: &[String], rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..lines.len()).collect();
        order.shuffle(rng);
        Self::build(lines, &order)
    }

    /// Lines displayed in the given order of canonical indices.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidOrder` if `order` is not a permutation of
    /// `0..lines.len()`.
    pub fn with_order(lines: &[String], order: &[usize]) -> Result<Self, AnswerError> {
        let len = lines.len();
        let mut seen = vec![false; len];
        if order.len() != len {
            return Err(AnswerError::InvalidOrder { len });
        }
        for &index in order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(AnswerError::InvalidOrder { len }),
            }
        }
        Ok(Self::build(lines, order))
    }

    fn build(lines: &[String], order: &[usize]) -> Self {
        Self {
            lines: order
                .iter()
                .map(|&original_index| StoryLine {
                    text: lines[original_index].clone(),
                    original_index,
                    position: None,
                })
                .collect(),
            feedback: false,
            solved: false,
        }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[StoryLine] {
        &self.lines
    }

    /// Assign (or clear) the 1-based position of the line at `line`.
    ///
    /// Returns the display index of the line that was vacated, if any.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::LineOutOfRange`, `AnswerError::PositionOutOfRange`,
    /// or `AnswerError::AlreadyResolved` once the story is solved.
    pub fn assign(&mut self, line: usize, position: Option<usize>) -> Result<Option<usize>, AnswerError> {
        if self.solved {
            return Err(AnswerError::AlreadyResolved);
        }
        let len = self.lines.len();
        if line >= len {
            return Err(AnswerError::LineOutOfRange { index: line, len });
        }
        if let Some(p) = position.filter(|p| !(1..=len).contains(p)) {
            return Err(AnswerError::PositionOutOfRange { position: p, len });
        }

        let mut vacated = None;
        if position.is_some() {
            for (index, other) in self.lines.iter_mut().enumerate() {
                if index != line && other.position == position {
                    other.position = None;
                    vacated = Some(index);
                }
            }
        }
        self.lines[line].position = position;
        Ok(vacated)
    }

    /// True iff every line has a position.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.lines.iter().all(|l| l.position.is_some())
    }

    /// Check the ordering and turn on per-line feedback.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::Unassigned` if any line lacks a position, or
    /// `AnswerError::AlreadyResolved` once solved.
    pub fn submit(&mut self) -> Result<StorySubmission, AnswerError> {
        if self.solved {
            return Err(AnswerError::AlreadyResolved);
        }
        if !self.can_submit() {
            return Err(AnswerError::Unassigned);
        }

        let mut sequence = vec![usize::MAX; self.lines.len()];
        for line in &self.lines {
            if let Some(position) = line.position {
                sequence[position - 1] = line.original_index;
            }
        }
        let correct = sequence.iter().enumerate().all(|(slot, &held)| held == slot);

        self.feedback = true;
        self.solved = correct;
        Ok(StorySubmission {
            verdict: if correct {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            },
            sequence,
            statuses: self.lines.iter().map(StoryLine::status).collect(),
        })
    }

    /// Live feedback for a line; `Pending` until the first submission.
    #[must_use]
    pub fn line_status(&self, line: usize) -> LineStatus {
        match self.lines.get(line) {
            Some(l) if self.feedback => l.status(),
            _ => LineStatus::Pending,
        }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Display order, or canonical order once solved.
    #[must_use]
    pub fn display_lines(&self) -> Vec<&StoryLine> {
        let mut lines: Vec<&StoryLine> = self.lines.iter().collect();
        if self.solved {
            lines.sort_by_key(|l| l.original_index);
        }
        lines
    }

    /// Clear positions and feedback, keeping the current display order.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.position = None;
        }
        self.feedback = false;
        self.solved = false;
    }
}
