use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use content::{ContentStore, PracticeProgress};
use lesson_core::model::{LessonId, LessonItem, Level};

use crate::error::PracticeError;

/// Random practice over a level's items, skipping the ones already marked read.
#[derive(Clone)]
pub struct PracticeService {
    store: Arc<ContentStore>,
    progress: Arc<dyn PracticeProgress>,
    batch_size: usize,
}

impl PracticeService {
    /// The batch size comes from the store's `ContentConfig`.
    #[must_use]
    pub fn new(store: Arc<ContentStore>, progress: Arc<dyn PracticeProgress>) -> Self {
        let batch_size = store.config().practice_batch_size();
        Self {
            store,
            progress,
            batch_size,
        }
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Up to `batch_size` unread items of `level`, in random order.
    ///
    /// An empty batch means every item of the level has been read.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Progress` if the read marks cannot be loaded.
    pub async fn random_batch(&self, level: Level) -> Result<Vec<LessonItem>, PracticeError> {
        let unread = self.unread(level).await?;
        Ok(self.pick(unread, &mut rand::rng()))
    }

    /// Like [`PracticeService::random_batch`], with a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// Same as [`PracticeService::random_batch`].
    pub async fn random_batch_with<R: Rng + Send + ?Sized>(
        &self,
        level: Level,
        rng: &mut R,
    ) -> Result<Vec<LessonItem>, PracticeError> {
        let unread = self.unread(level).await?;
        Ok(self.pick(unread, rng))
    }

    /// Mark an item read. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Progress` if the mark cannot be stored.
    pub async fn mark_as_read(&self, level: Level, id: &LessonId) -> Result<bool, PracticeError> {
        let added = self
            .progress
            .mark_read(level, std::slice::from_ref(id))
            .await?;
        Ok(added > 0)
    }

    /// # Errors
    ///
    /// Returns `PracticeError::Progress` if the marks cannot be cleared.
    pub async fn reset_progress(&self, level: Level) -> Result<(), PracticeError> {
        self.progress.reset(level).await?;
        log::info!("[PRACTICE] progress reset level:{level}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PracticeError::Progress` if the marks cannot be loaded.
    pub async fn read_count(&self, level: Level) -> Result<usize, PracticeError> {
        Ok(self.progress.read_ids(level).await?.len())
    }

    /// Items of the level's lesson files, falling back to the per-level file.
    async fn items(&self, level: Level) -> Vec<LessonItem> {
        let grouped: Vec<LessonItem> = self
            .store
            .lesson_groups(level)
            .await
            .into_iter()
            .flat_map(|group| group.items)
            .collect();
        if grouped.is_empty() {
            self.store.level_items(level).await
        } else {
            grouped
        }
    }

    async fn unread(&self, level: Level) -> Result<Vec<LessonItem>, PracticeError> {
        let items = self.items(level).await;
        let read = self.progress.read_ids(level).await?;
        let total = items.len();
        let unread: Vec<LessonItem> = items
            .into_iter()
            .filter(|item| !read.contains(&item.id))
            .collect();
        log::debug!(
            "[PRACTICE] level:{level} items:{total} unread:{}",
            unread.len()
        );
        Ok(unread)
    }

    fn pick<R: Rng + ?Sized>(&self, mut items: Vec<LessonItem>, rng: &mut R) -> Vec<LessonItem> {
        items.shuffle(rng);
        items.truncate(self.batch_size);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content::{ContentConfig, InMemoryProgress, InMemorySource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn level_file(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"id":"w{i}","level":2,"type":"word","native":"n{i}","transliteration":"t{i}"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    fn service(source: InMemorySource, batch: usize) -> PracticeService {
        let store = ContentStore::new(
            Arc::new(source),
            ContentConfig::default()
                .with_max_lessons_per_level(1)
                .with_practice_batch_size(batch),
        );
        PracticeService::new(Arc::new(store), Arc::new(InMemoryProgress::new()))
    }

    #[tokio::test]
    async fn batches_skip_read_items_until_level_is_finished() {
        let source = InMemorySource::new();
        source.insert("lessons/level-2.json", level_file(5)).unwrap();
        let practice = service(source, 3);
        let level = Level::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = Vec::new();
        loop {
            let batch = practice.random_batch_with(level, &mut rng).await.unwrap();
            if batch.is_empty() {
                break;
            }
            assert!(batch.len() <= 3);
            for item in batch {
                assert!(!seen.contains(&item.id));
                assert!(practice.mark_as_read(level, &item.id).await.unwrap());
                seen.push(item.id);
            }
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(practice.read_count(level).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn mark_as_read_is_idempotent_and_reset_clears() {
        let source = InMemorySource::new();
        source.insert("lessons/level-2.json", level_file(2)).unwrap();
        let practice = service(source, 10);
        let level = Level::new(2).unwrap();
        let id = LessonId::new("w0");

        assert!(practice.mark_as_read(level, &id).await.unwrap());
        assert!(!practice.mark_as_read(level, &id).await.unwrap());
        assert_eq!(practice.random_batch(level).await.unwrap().len(), 1);

        practice.reset_progress(level).await.unwrap();
        assert_eq!(practice.random_batch(level).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn prefers_lesson_files_over_level_file() {
        let source = InMemorySource::new();
        source
            .insert(
                "lessons/level-2-lesson-1.json",
                r#"{"metadata":{"title":"Greetings"},"items":[
                    {"id":"g1","level":2,"type":"word","native":"hi","transliteration":"hi"}
                ]}"#,
            )
            .unwrap();
        source.insert("lessons/level-2.json", level_file(4)).unwrap();
        let practice = service(source, 10);

        let batch = practice.random_batch(Level::new(2).unwrap()).await.unwrap();
        let ids: Vec<&str> = batch.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["g1"]);
    }

    #[tokio::test]
    async fn missing_content_gives_empty_batch() {
        let practice = service(InMemorySource::new(), 10);
        assert!(practice.random_batch(Level::new(5).unwrap()).await.unwrap().is_empty());
    }
}
