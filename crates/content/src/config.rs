use lesson_core::model::Level;

const DEFAULT_LESSON_TEMPLATE: &str = "lessons/level-{level}-lesson-{lessonNumber}.json";
const DEFAULT_LEVEL_TEMPLATE: &str = "lessons/level-{level}.json";
const DEFAULT_QUIZ_TEMPLATE: &str = "quizzes/level-{level}-quiz-{quizNumber}.json";

/// Where content files live and how many of them to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    lesson_path_template: String,
    level_path_template: String,
    quiz_path_template: String,
    max_lessons_per_level: u32,
    max_quizzes_per_level: u32,
    practice_batch_size: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            lesson_path_template: DEFAULT_LESSON_TEMPLATE.to_string(),
            level_path_template: DEFAULT_LEVEL_TEMPLATE.to_string(),
            quiz_path_template: DEFAULT_QUIZ_TEMPLATE.to_string(),
            max_lessons_per_level: 10,
            max_quizzes_per_level: 5,
            practice_batch_size: 10,
        }
    }
}

impl ContentConfig {
    #[must_use]
    pub fn with_lesson_path_template(mut self, template: impl Into<String>) -> Self {
        self.lesson_path_template = template.into();
        self
    }

    #[must_use]
    pub fn with_level_path_template(mut self, template: impl Into<String>) -> Self {
        self.level_path_template = template.into();
        self
    }

    #[must_use]
    pub fn with_quiz_path_template(mut self, template: impl Into<String>) -> Self {
        self.quiz_path_template = template.into();
        self
    }

    #[must_use]
    pub fn with_max_lessons_per_level(mut self, max: u32) -> Self {
        self.max_lessons_per_level = max;
        self
    }

    #[must_use]
    pub fn with_max_quizzes_per_level(mut self, max: u32) -> Self {
        self.max_quizzes_per_level = max;
        self
    }

    /// Sets the practice batch size; zero is bumped to one.
    #[must_use]
    pub fn with_practice_batch_size(mut self, size: usize) -> Self {
        self.practice_batch_size = size.max(1);
        self
    }

    #[must_use]
    pub fn max_lessons_per_level(&self) -> u32 {
        self.max_lessons_per_level
    }

    #[must_use]
    pub fn max_quizzes_per_level(&self) -> u32 {
        self.max_quizzes_per_level
    }

    #[must_use]
    pub fn practice_batch_size(&self) -> usize {
        self.practice_batch_size
    }

    #[must_use]
    pub fn lesson_path(&self, level: Level, lesson_number: u32) -> String {
        self.lesson_path_template
            .replace("{level}", &level.to_string())
            .replace("{lessonNumber}", &lesson_number.to_string())
    }

    #[must_use]
    pub fn level_path(&self, level: Level) -> String {
        self.level_path_template.replace("{level}", &level.to_string())
    }

    #[must_use]
    pub fn quiz_path(&self, level: Level, quiz_number: u32) -> String {
        self.quiz_path_template
            .replace("{level}", &level.to_string())
            .replace("{quizNumber}", &quiz_number.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = ContentConfig::default();
        let level = Level::new(2).unwrap();
        assert_eq!(config.lesson_path(level, 3), "lessons/level-2-lesson-3.json");
        assert_eq!(config.level_path(level), "lessons/level-2.json");
        assert_eq!(config.quiz_path(level, 1), "quizzes/level-2-quiz-1.json");
    }

    #[test]
    fn custom_templates_and_limits() {
        let config = ContentConfig::default()
            .with_quiz_path_template("ar/q{level}-{quizNumber}.json")
            .with_max_quizzes_per_level(2)
            .with_practice_batch_size(0);
        assert_eq!(config.quiz_path(Level::new(5).unwrap(), 2), "ar/q5-2.json");
        assert_eq!(config.max_quizzes_per_level(), 2);
        assert_eq!(config.practice_batch_size(), 1);
    }
}
