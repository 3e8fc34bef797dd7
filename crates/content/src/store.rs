use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use lesson_core::model::{ContentFile, LessonGroup, LessonItem, Level, Question, Quiz};
use serde::de::DeserializeOwned;

use crate::config::ContentConfig;
use crate::error::ContentError;
use crate::source::ContentSource;

/// Loads lesson and quiz files through a [`ContentSource`] and caches them.
///
/// Cache entries are keyed by level and file number. They never change once
/// populated and are never invalidated. Failures are logged and turned into
/// empty results instead of being propagated.
pub struct ContentStore {
    source: Arc<dyn ContentSource>,
    config: ContentConfig,
    lesson_groups: Mutex<HashMap<(Level, u32), LessonGroup>>,
    level_items: Mutex<HashMap<Level, Vec<LessonItem>>>,
    quizzes: Mutex<HashMap<(Level, u32), Quiz>>,
}

impl ContentStore {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, config: ContentConfig) -> Self {
        Self {
            source,
            config,
            lesson_groups: Mutex::new(HashMap::new()),
            level_items: Mutex::new(HashMap::new()),
            quizzes: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ContentError> {
        let body = self.source.fetch(path).await?;
        serde_json::from_str(&body).map_err(|source| ContentError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Fetch and parse a lesson group, bypassing the recovery layer.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the file is missing or malformed.
    pub async fn try_lesson_group(
        &self,
        level: Level,
        lesson_number: u32,
    ) -> Result<LessonGroup, ContentError> {
        if let Some(group) = cached(&self.lesson_groups, &(level, lesson_number)) {
            return Ok(group);
        }
        let path = self.config.lesson_path(level, lesson_number);
        let file: ContentFile<LessonItem> = self.fetch_json(&path).await?;
        let group = LessonGroup::from_file(file, level, lesson_number);
        log::debug!(
            "[CONTENT] loaded lesson level:{level} lesson:{lesson_number} items:{}",
            group.items.len()
        );
        Ok(remember(&self.lesson_groups, (level, lesson_number), group))
    }

    /// A single lesson group, or `None` if it is missing or malformed.
    pub async fn lesson_group(&self, level: Level, lesson_number: u32) -> Option<LessonGroup> {
        recover(
            self.try_lesson_group(level, lesson_number).await,
            &self.config.lesson_path(level, lesson_number),
        )
    }

    /// Every lesson group of a level, probing `1..=max_lessons_per_level`.
    pub async fn lesson_groups(&self, level: Level) -> Vec<LessonGroup> {
        let mut groups = Vec::new();
        for lesson_number in 1..=self.config.max_lessons_per_level() {
            if let Some(group) = self.lesson_group(level, lesson_number).await {
                groups.push(group);
            }
        }
        groups
    }

    /// Items of the per-level file. Empty results are not cached so a later
    /// call can retry.
    pub async fn level_items(&self, level: Level) -> Vec<LessonItem> {
        if let Some(items) = cached(&self.level_items, &level) {
            return items;
        }
        let path = self.config.level_path(level);
        let loaded = self
            .fetch_json::<ContentFile<LessonItem>>(&path)
            .await
            .map(|file| file.into_parts().1);
        let items = recover(loaded, &path).unwrap_or_default();
        if items.is_empty() {
            return items;
        }
        remember(&self.level_items, level, items)
    }

    /// Items of every level, in level order.
    pub async fn all_items(&self) -> Vec<LessonItem> {
        let mut all = Vec::new();
        for level in Level::all() {
            all.extend(self.level_items(level).await);
        }
        all
    }

    /// Fetch and parse a quiz, bypassing the recovery layer.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the file is missing or malformed.
    pub async fn try_quiz(&self, level: Level, number: u32) -> Result<Quiz, ContentError> {
        if let Some(quiz) = cached(&self.quizzes, &(level, number)) {
            return Ok(quiz);
        }
        let path = self.config.quiz_path(level, number);
        let file: ContentFile<Question> = self.fetch_json(&path).await?;
        let quiz = Quiz::from_file(file, level, number);
        log::debug!(
            "[CONTENT] loaded quiz level:{level} quiz:{number} questions:{}",
            quiz.questions.len()
        );
        Ok(remember(&self.quizzes, (level, number), quiz))
    }

    /// A quiz, or `None` if it is missing or malformed.
    pub async fn quiz(&self, level: Level, number: u32) -> Option<Quiz> {
        recover(
            self.try_quiz(level, number).await,
            &self.config.quiz_path(level, number),
        )
    }

    /// Every quiz of a level, probing `1..=max_quizzes_per_level`.
    pub async fn quizzes(&self, level: Level) -> Vec<Quiz> {
        let mut quizzes = Vec::new();
        for number in 1..=self.config.max_quizzes_per_level() {
            if let Some(quiz) = self.quiz(level, number).await {
                quizzes.push(quiz);
            }
        }
        quizzes
    }
}

fn recover<T>(result: Result<T, ContentError>, path: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_not_found() => {
            log::debug!("[CONTENT] missing path:{path}");
            None
        }
        Err(err) => {
            log::warn!("[CONTENT] failed path:{path} error:{err}");
            None
        }
    }
}

fn cached<K: Eq + Hash, V: Clone>(map: &Mutex<HashMap<K, V>>, key: &K) -> Option<V> {
    map.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

/// Inserts `value` unless another load won the race; returns the cached entry.
fn remember<K: Eq + Hash, V: Clone>(map: &Mutex<HashMap<K, V>>, key: K, value: V) -> V {
    map.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(value)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    fn level(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    fn store_with(source: &InMemorySource) -> ContentStore {
        ContentStore::new(
            Arc::new(source.clone()),
            ContentConfig::default().with_max_lessons_per_level(3),
        )
    }

    const ITEMS: &str = r#"[
        {"id":"l1-a","level":1,"type":"letter","native":"A","transliteration":"a","audioSrc":""}
    ]"#;

    #[tokio::test]
    async fn lesson_group_is_fetched_once() {
        let source = InMemorySource::new();
        source
            .insert("lessons/level-1-lesson-1.json", ITEMS)
            .unwrap();
        let store = store_with(&source);

        let first = store.lesson_group(level(1), 1).await.unwrap();
        let second = store.lesson_group(level(1), 1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Lesson 1");
        assert_eq!(source.fetch_count("lessons/level-1-lesson-1.json"), 1);
    }

    #[tokio::test]
    async fn lesson_groups_skip_missing_and_malformed_files() {
        let source = InMemorySource::new();
        source
            .insert("lessons/level-1-lesson-1.json", ITEMS)
            .unwrap();
        source
            .insert("lessons/level-1-lesson-2.json", "{ not json")
            .unwrap();
        source
            .insert(
                "lessons/level-1-lesson-3.json",
                format!(r#"{{"metadata":{{"title":"Vowels"}},"items":{ITEMS}}}"#),
            )
            .unwrap();
        let store = store_with(&source);

        let groups = store.lesson_groups(level(1)).await;
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Lesson 1", "Vowels"]);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let source = InMemorySource::new();
        let store = store_with(&source);
        assert!(store.quiz(level(2), 1).await.is_none());

        source
            .insert(
                "quizzes/level-2-quiz-1.json",
                r#"[{"id":"q1","level":2,"type":"word","options":["a","b"],"correctAnswerIndex":1}]"#,
            )
            .unwrap();
        let quiz = store.quiz(level(2), 1).await.unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(source.fetch_count("quizzes/level-2-quiz-1.json"), 2);
    }

    #[tokio::test]
    async fn level_items_recover_to_empty() {
        let source = InMemorySource::new();
        source.insert("lessons/level-1.json", ITEMS).unwrap();
        source.insert("lessons/level-2.json", "oops").unwrap();
        let store = store_with(&source);

        assert_eq!(store.level_items(level(1)).await.len(), 1);
        assert!(store.level_items(level(2)).await.is_empty());
        assert_eq!(store.all_items().await.len(), 1);
        assert_eq!(source.fetch_count("lessons/level-1.json"), 1);
    }

    #[tokio::test]
    async fn try_quiz_surfaces_parse_errors() {
        let source = InMemorySource::new();
        source.insert("quizzes/level-3-quiz-1.json", "[1,2]").unwrap();
        let store = store_with(&source);

        let err = store.try_quiz(level(3), 1).await.unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
        let missing = store.try_quiz(level(3), 2).await.unwrap_err();
        assert!(missing.is_not_found());
    }
}
