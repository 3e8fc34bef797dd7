use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lesson_core::model::{LessonId, Level};

use crate::error::ContentError;

/// Tracks which lesson items were marked read during random practice.
#[async_trait]
pub trait PracticeProgress: Send + Sync {
    /// Ids marked read for a level.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the backend cannot be read.
    async fn read_ids(&self, level: Level) -> Result<HashSet<LessonId>, ContentError>;

    /// Mark ids as read, returning how many were not marked before.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the backend cannot be written.
    async fn mark_read(&self, level: Level, ids: &[LessonId]) -> Result<usize, ContentError>;

    /// Forget every read mark for a level.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the backend cannot be written.
    async fn reset(&self, level: Level) -> Result<(), ContentError>;
}

/// Process-lifetime progress store.
#[derive(Clone, Default)]
pub struct InMemoryProgress {
    read: Arc<Mutex<HashMap<Level, HashSet<LessonId>>>>,
}

impl InMemoryProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PracticeProgress for InMemoryProgress {
    async fn read_ids(&self, level: Level) -> Result<HashSet<LessonId>, ContentError> {
        let guard = self.read.lock().map_err(|_| ContentError::Poisoned)?;
        Ok(guard.get(&level).cloned().unwrap_or_default())
    }

    async fn mark_read(&self, level: Level, ids: &[LessonId]) -> Result<usize, ContentError> {
        let mut guard = self.read.lock().map_err(|_| ContentError::Poisoned)?;
        let entry = guard.entry(level).or_default();
        Ok(ids.iter().filter(|id| entry.insert((*id).clone())).count())
    }

    async fn reset(&self, level: Level) -> Result<(), ContentError> {
        let mut guard = self.read.lock().map_err(|_| ContentError::Poisoned)?;
        guard.remove(&level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn marks_are_idempotent_and_scoped_by_level() {
        let progress = InMemoryProgress::new();
        let one = Level::new(1).unwrap();
        let two = Level::new(2).unwrap();
        let ids = [LessonId::new("a"), LessonId::new("b")];

        assert_eq!(progress.mark_read(one, &ids).await.unwrap(), 2);
        assert_eq!(progress.mark_read(one, &ids[..1]).await.unwrap(), 0);
        assert_eq!(progress.read_ids(one).await.unwrap().len(), 2);
        assert!(progress.read_ids(two).await.unwrap().is_empty());

        progress.reset(one).await.unwrap();
        assert!(progress.read_ids(one).await.unwrap().is_empty());
    }
}
