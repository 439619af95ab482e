//! In-memory store

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use uuid::Uuid;

use super::highlights::{self, TextHighlight};
use super::preferences::{clamp_font_size, ReaderPreferences};
use super::{FavoritesStore, HighlightStore, PreferenceStore, ProgressStore, Result};

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    favorites: RwLock<BTreeSet<String>>,
    progress: RwLock<BTreeMap<String, usize>>,
    highlights: RwLock<Vec<TextHighlight>>,
    preferences: RwLock<ReaderPreferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryStore {
    fn is_favorite(&self, path: &str) -> Result<bool> {
        Ok(self.favorites.read().contains(path))
    }

    fn set_favorite(&self, path: &str, favorite: bool) -> Result<()> {
        let mut favorites = self.favorites.write();
        if favorite {
            favorites.insert(path.to_string());
        } else {
            favorites.remove(path);
        }
        Ok(())
    }

    fn favorites(&self) -> Result<Vec<String>> {
        Ok(self.favorites.read().iter().cloned().collect())
    }
}

impl ProgressStore for MemoryStore {
    fn get_progress(&self, path: &str) -> Result<usize> {
        Ok(self.progress.read().get(path).copied().unwrap_or(0))
    }

    fn save_progress(&self, path: &str, position: usize) -> Result<()> {
        self.progress.write().insert(path.to_string(), position);
        Ok(())
    }

    fn clear_progress(&self, path: &str) -> Result<()> {
        self.progress.write().remove(path);
        Ok(())
    }
}

impl HighlightStore for MemoryStore {
    fn save_highlight(&self, highlight: TextHighlight) -> Result<()> {
        self.highlights.write().push(highlight);
        Ok(())
    }

    fn remove_highlight(&self, id: Uuid) -> Result<bool> {
        let mut all = self.highlights.write();
        let before = all.len();
        all.retain(|h| h.id != id);
        Ok(all.len() != before)
    }

    fn highlights_for_book(&self, book_path: &str) -> Result<Vec<TextHighlight>> {
        Ok(highlights::for_book(&self.highlights.read(), book_path)
            .cloned()
            .collect())
    }

    fn highlights_for_chapter(
        &self,
        book_path: &str,
        chapter_index: usize,
    ) -> Result<Vec<TextHighlight>> {
        Ok(
            highlights::for_chapter(&self.highlights.read(), book_path, chapter_index)
                .cloned()
                .collect(),
        )
    }

    fn clear_book_highlights(&self, book_path: &str) -> Result<()> {
        self.highlights.write().retain(|h| h.book_path != book_path);
        Ok(())
    }

    fn highlight_at(
        &self,
        book_path: &str,
        chapter_index: usize,
        offset: usize,
    ) -> Result<Option<TextHighlight>> {
        Ok(
            highlights::at_position(&self.highlights.read(), book_path, chapter_index, offset)
                .cloned(),
        )
    }
}

impl PreferenceStore for MemoryStore {
    fn preferences(&self) -> Result<ReaderPreferences> {
        Ok(*self.preferences.read())
    }

    fn set_dark_theme(&self, dark: bool) -> Result<()> {
        self.preferences.write().dark_theme = dark;
        Ok(())
    }

    fn set_font_size(&self, size: u32) -> Result<u32> {
        let size = clamp_font_size(size);
        self.preferences.write().font_size = size;
        Ok(size)
    }
}
