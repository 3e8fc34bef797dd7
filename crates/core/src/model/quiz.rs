use crate::model::document::ContentFile;
use crate::model::level::Level;
use crate::model::question::{Question, QuestionError};

/// A quiz loaded from one `level-X-quiz-N` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub level: Level,
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn from_file(file: ContentFile<Question>, level: Level, number: u32) -> Self {
        let (metadata, questions) = file.into_parts();
        Self {
            level,
            number,
            title: metadata
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Quiz {number}")),
            description: metadata.description,
            questions,
        }
    }

    /// Validates every question in order, stopping at the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        self.questions.iter().try_for_each(Question::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_document() {
        let file: ContentFile<Question> = serde_json::from_str(
            r#"{
                "metadata": { "title": "Letters quiz" },
                "items": [
                    {"id":"q1","level":1,"type":"alphabet","options":["a","b"],"correctAnswerIndex":0}
                ]
            }"#,
        )
        .unwrap();
        let quiz = Quiz::from_file(file, Level::new(1).unwrap(), 2);
        assert_eq!(quiz.title, "Letters quiz");
        assert_eq!(quiz.number, 2);
        assert_eq!(quiz.questions.len(), 1);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn default_title_uses_number() {
        let quiz = Quiz::from_file(ContentFile::Items(vec![]), Level::new(3).unwrap(), 4);
        assert_eq!(quiz.title, "Quiz 4");
    }
}
