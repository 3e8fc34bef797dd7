use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::level::Level;

/// Placeholder token in a fill-blank sentence.
pub const BLANK_TOKEN: &str = "{{blank}}";

/// Visual marker substituted for an unanswered blank.
pub const BLANK_MARKER: &str = "_____";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Malformed quiz content detected before a session starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no options")]
    EmptyOptions { id: QuestionId },

    #[error("question {id}: correct answer index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("question {id}: template is missing placeholder {token}")]
    MissingPlaceholder { id: QuestionId, token: String },

    #[error("question {id} has no blanks")]
    NoBlanks { id: QuestionId },

    #[error("question {id}: blank id {blank_id} is used more than once")]
    DuplicateBlank { id: QuestionId, blank_id: String },

    #[error("question {id} has no story lines")]
    EmptyStory { id: QuestionId },
}

//
// ─── MODEL ─────────────────────────────────────────────────────────────────────
//

/// A quiz question. The kind-specific payload sits next to the common fields
/// in the JSON object and is selected by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub level: Level,
    #[serde(default, alias = "question")]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Tagged union over the four question kinds.
///
/// The lesson-type names used by older quiz files are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    #[serde(alias = "alphabet", alias = "word")]
    MultipleChoice(ChoiceQuestion),
    #[serde(alias = "sentence")]
    FillBlank(FillBlankQuestion),
    #[serde(alias = "paragraph")]
    MultipleBlanks(MultiBlankQuestion),
    #[serde(alias = "story")]
    StorySequence(StoryQuestion),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankQuestion {
    pub sentence: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl FillBlankQuestion {
    /// The sentence with its placeholder replaced by the blank marker.
    #[must_use]
    pub fn display_sentence(&self) -> String {
        self.sentence.replacen(BLANK_TOKEN, BLANK_MARKER, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiBlankQuestion {
    pub paragraph: String,
    pub blanks: Vec<Blank>,
}

/// One fill-in slot of a multi-blank paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    pub blank_id: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl Blank {
    /// The `{{id}}` token this blank replaces in the paragraph.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.blank_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryQuestion {
    /// Lines in their canonical order.
    pub lines: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Question {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            QuestionKind::MultipleChoice(_) => "multiple-choice",
            QuestionKind::FillBlank(_) => "fill-blank",
            QuestionKind::MultipleBlanks(_) => "multiple-blanks",
            QuestionKind::StorySequence(_) => "story-sequence",
        }
    }

    /// Options of a single-blank question, `None` for the other kinds.
    #[must_use]
    pub fn single_options(&self) -> Option<(&[String], usize)> {
        match &self.kind {
            QuestionKind::MultipleChoice(q) => Some((&q.options, q.correct_answer_index)),
            QuestionKind::FillBlank(q) => Some((&q.options, q.correct_answer_index)),
            _ => None,
        }
    }

    /// Checks that the question is answerable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty option lists, out-of-range correct
    /// indices, missing placeholders, duplicate blank ids or empty stories.
    pub fn validate(&self) -> Result<(), QuestionError> {
        let id = &self.id;
        match &self.kind {
            QuestionKind::MultipleChoice(q) => {
                check_options(id, &q.options, q.correct_answer_index)
            }
            QuestionKind::FillBlank(q) => {
                check_options(id, &q.options, q.correct_answer_index)?;
                if !q.sentence.contains(BLANK_TOKEN) {
                    return Err(QuestionError::MissingPlaceholder {
                        id: id.clone(),
                        token: BLANK_TOKEN.to_string(),
                    });
                }
                Ok(())
            }
            QuestionKind::MultipleBlanks(q) => {
                if q.blanks.is_empty() {
                    return Err(QuestionError::NoBlanks { id: id.clone() });
                }
                let mut seen = HashSet::new();
                for blank in &q.blanks {
                    if !seen.insert(blank.blank_id.as_str()) {
                        return Err(QuestionError::DuplicateBlank {
                            id: id.clone(),
                            blank_id: blank.blank_id.clone(),
                        });
                    }
                    check_options(id, &blank.options, blank.correct_answer_index)?;
                    let token = blank.placeholder();
                    if !q.paragraph.contains(&token) {
                        return Err(QuestionError::MissingPlaceholder {
                            id: id.clone(),
                            token,
                        });
                    }
                }
                Ok(())
            }
            QuestionKind::StorySequence(q) => {
                if q.lines.is_empty() {
                    return Err(QuestionError::EmptyStory { id: id.clone() });
                }
                Ok(())
            }
        }
    }
}

fn check_options(id: &QuestionId, options: &[String], correct: usize) -> Result<(), QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::EmptyOptions { id: id.clone() });
    }
    if correct >= options.len() {
        return Err(QuestionError::CorrectIndexOutOfRange {
            id: id.clone(),
            index: correct,
            len: options.len(),
        });
    }
    Ok(())
}
