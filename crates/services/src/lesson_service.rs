use content::ContentStore;
use lesson_core::model::{LessonId, LessonItem, Level};

use crate::error::LessonError;

/// Lookup and prev/next navigation over every lesson item, in level order.
///
/// Navigation is relative to the current item and does not move it; callers
/// follow a link with [`LessonService::set_current`].
#[derive(Debug, Clone, Default)]
pub struct LessonService {
    items: Vec<LessonItem>,
    current: Option<usize>,
}

impl LessonService {
    #[must_use]
    pub fn from_items(items: Vec<LessonItem>) -> Self {
        Self {
            items,
            current: None,
        }
    }

    /// Collect the per-level items of every level from the store.
    pub async fn load(store: &ContentStore) -> Self {
        let items = store.all_items().await;
        log::info!("[LESSON] loaded items:{}", items.len());
        Self::from_items(items)
    }

    #[must_use]
    pub fn lessons(&self) -> &[LessonItem] {
        &self.items
    }

    pub fn by_level(&self, level: Level) -> impl Iterator<Item = &LessonItem> {
        self.items.iter().filter(move |item| item.level == level)
    }

    #[must_use]
    pub fn lesson_by_id(&self, id: &LessonId) -> Option<&LessonItem> {
        self.position(id).map(|index| &self.items[index])
    }

    /// Make `id` the current item.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NotFound` for an unknown id; the current item is
    /// left unchanged.
    pub fn set_current(&mut self, id: &LessonId) -> Result<&LessonItem, LessonError> {
        let index = self
            .position(id)
            .ok_or_else(|| LessonError::NotFound(id.clone()))?;
        self.current = Some(index);
        Ok(&self.items[index])
    }

    #[must_use]
    pub fn current(&self) -> Option<&LessonItem> {
        self.current.and_then(|index| self.items.get(index))
    }

    #[must_use]
    pub fn next(&self) -> Option<&LessonItem> {
        self.current.and_then(|index| self.items.get(index + 1))
    }

    #[must_use]
    pub fn previous(&self) -> Option<&LessonItem> {
        self.current
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.items.get(index))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next().is_some()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.previous().is_some()
    }

    fn position(&self, id: &LessonId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::LessonType;

    fn item(id: &str, level: u8) -> LessonItem {
        LessonItem {
            id: LessonId::new(id),
            level: Level::new(level).unwrap(),
            kind: LessonType::Word,
            native: id.to_uppercase(),
            transliteration: id.to_string(),
            meaning: None,
            title: None,
            audio_src: String::new(),
        }
    }

    fn service() -> LessonService {
        LessonService::from_items(vec![item("a", 1), item("b", 1), item("c", 2)])
    }

    #[test]
    fn navigation_is_empty_without_current() {
        let lessons = service();
        assert!(lessons.current().is_none());
        assert!(!lessons.has_next());
        assert!(!lessons.has_previous());
    }

    #[test]
    fn next_and_previous_are_relative_to_current() {
        let mut lessons = service();
        lessons.set_current(&LessonId::new("b")).unwrap();
        assert_eq!(lessons.previous().map(|i| i.id.as_str()), Some("a"));
        assert_eq!(lessons.next().map(|i| i.id.as_str()), Some("c"));
        assert_eq!(lessons.current().map(|i| i.id.as_str()), Some("b"));

        lessons.set_current(&LessonId::new("a")).unwrap();
        assert!(!lessons.has_previous());
        lessons.set_current(&LessonId::new("c")).unwrap();
        assert!(!lessons.has_next());
    }

    #[test]
    fn unknown_id_keeps_current() {
        let mut lessons = service();
        lessons.set_current(&LessonId::new("a")).unwrap();
        let err = lessons.set_current(&LessonId::new("zz")).unwrap_err();
        assert_eq!(err, LessonError::NotFound(LessonId::new("zz")));
        assert_eq!(lessons.current().map(|i| i.id.as_str()), Some("a"));
        assert!(lessons.lesson_by_id(&LessonId::new("zz")).is_none());
    }

    #[test]
    fn filters_by_level() {
        let lessons = service();
        let level_two: Vec<_> = lessons
            .by_level(Level::new(2).unwrap())
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(level_two, vec!["c"]);
    }
}
