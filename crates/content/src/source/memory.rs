use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::ContentSource;
use crate::error::ContentError;

/// In-memory source for tests and prototyping. Counts fetches per path.
#[derive(Clone, Default)]
pub struct InMemorySource {
    files: Arc<Mutex<HashMap<String, String>>>,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Poisoned` if the file map lock is poisoned.
    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) -> Result<(), ContentError> {
        let mut guard = self.files.lock().map_err(|_| ContentError::Poisoned)?;
        guard.insert(path.into(), body.into());
        Ok(())
    }

    /// Number of times `path` was fetched, including misses.
    #[must_use]
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches
            .lock()
            .map(|guard| guard.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        {
            let mut counts = self.fetches.lock().map_err(|_| ContentError::Poisoned)?;
            *counts.entry(path.to_string()).or_insert(0) += 1;
        }
        let guard = self.files.lock().map_err(|_| ContentError::Poisoned)?;
        guard.get(path).cloned().ok_or_else(|| ContentError::NotFound {
            path: path.to_string(),
        })
    }
}
