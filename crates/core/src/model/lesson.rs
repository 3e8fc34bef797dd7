use serde::{Deserialize, Serialize};

use crate::model::document::ContentFile;
use crate::model::ids::LessonId;
use crate::model::level::Level;

/// Number of characters kept when a long item is previewed in a list.
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Letter,
    Word,
    Sentence,
    Paragraph,
    Story,
}

impl LessonType {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            LessonType::Letter => "Letter",
            LessonType::Word => "Word",
            LessonType::Sentence => "Sentence",
            LessonType::Paragraph => "Paragraph",
            LessonType::Story => "Story",
        }
    }

    fn is_long_form(self) -> bool {
        matches!(self, LessonType::Paragraph | LessonType::Story)
    }
}

/// A single piece of study material: a letter, word, sentence, paragraph or story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonItem {
    pub id: LessonId,
    pub level: Level,
    #[serde(rename = "type")]
    pub kind: LessonType,
    pub native: String,
    pub transliteration: String,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub audio_src: String,
}

impl LessonItem {
    /// Text shown for this item in a lesson list.
    ///
    /// Uses the title when present; long-form items are otherwise truncated.
    #[must_use]
    pub fn display_content(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        if self.kind.is_long_form() {
            let preview: String = self.native.chars().take(PREVIEW_CHARS).collect();
            return format!("{preview}...");
        }
        self.native.clone()
    }
}

/// Lessons loaded from one `level-X-lesson-N` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonGroup {
    pub level: Level,
    pub lesson_number: u32,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<LessonItem>,
}

impl LessonGroup {
    /// Builds a group from either file shape, defaulting the title to `Lesson N`.
    #[must_use]
    pub fn from_file(file: ContentFile<LessonItem>, level: Level, lesson_number: u32) -> Self {
        let (metadata, items) = file.into_parts();
        Self {
            level,
            lesson_number,
            title: metadata
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Lesson {lesson_number}")),
            description: metadata.description,
            items,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> LessonGroupMetadata {
        LessonGroupMetadata {
            level: self.level,
            lesson_number: self.lesson_number,
            title: self.title.clone(),
            description: self.description.clone(),
            item_count: self.items.len(),
        }
    }
}

/// Summary of a lesson group for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonGroupMetadata {
    pub level: Level,
    pub lesson_number: u32,
    pub title: String,
    pub description: Option<String>,
    pub item_count: usize,
}
