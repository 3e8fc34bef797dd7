//! Pluggable backends that hand raw JSON text to the content store.

mod fs;
mod http;
mod memory;

use async_trait::async_trait;

use crate::error::ContentError;

pub use fs::FsSource;
pub use http::HttpSource;
pub use memory::InMemorySource;

/// Fetches the raw text of a content file by relative path.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the file at `path`, relative to the source root.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if the file does not exist, or other
    /// errors for I/O and transport failures.
    async fn fetch(&self, path: &str) -> Result<String, ContentError>;
}
