use serde::{Deserialize, Serialize};

/// Optional header of a content file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// On-disk shape of a lesson or quiz file.
///
/// Older files are a bare array of items; newer ones wrap the array in an
/// object with optional `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentFile<T> {
    Document {
        #[serde(default)]
        metadata: Option<FileMetadata>,
        items: Vec<T>,
    },
    Items(Vec<T>),
}

impl<T> ContentFile<T> {
    #[must_use]
    pub fn metadata(&self) -> Option<&FileMetadata> {
        match self {
            ContentFile::Document { metadata, .. } => metadata.as_ref(),
            ContentFile::Items(_) => None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            ContentFile::Document { items, .. } | ContentFile::Items(items) => items,
        }
    }

    /// Splits the file into its metadata (empty for bare arrays) and items.
    #[must_use]
    pub fn into_parts(self) -> (FileMetadata, Vec<T>) {
        match self {
            ContentFile::Document { metadata, items } => (metadata.unwrap_or_default(), items),
            ContentFile::Items(items) => (FileMetadata::default(), items),
        }
    }
}
