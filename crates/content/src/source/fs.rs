use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::ContentSource;
use crate::error::ContentError;

/// Reads content files from a local directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ContentError::NotFound {
                    path: path.to_string(),
                },
                _ => ContentError::Io {
                    path: path.to_string(),
                    source,
                },
            })
    }
}
