//! Reader state stores
//!
//! Favorites, reading progress, highlights and preferences sit behind small
//! traits so callers can swap the in-memory store used in tests for the
//! JSON-backed one used by the server.

mod error;
pub mod highlights;
mod json;
mod memory;
pub mod preferences;

use uuid::Uuid;

pub use error::{Result, StoreError};
pub use highlights::TextHighlight;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use preferences::ReaderPreferences;

/// Set of favorite book paths
pub trait FavoritesStore: Send + Sync {
    fn is_favorite(&self, path: &str) -> Result<bool>;

    fn set_favorite(&self, path: &str, favorite: bool) -> Result<()>;

    /// Flip the favorite flag and return the new state
    fn toggle_favorite(&self, path: &str) -> Result<bool> {
        let favorite = !self.is_favorite(path)?;
        self.set_favorite(path, favorite)?;
        Ok(favorite)
    }

    /// All favorite paths, sorted
    fn favorites(&self) -> Result<Vec<String>>;
}

/// Last reading position per book (page or chapter index)
pub trait ProgressStore: Send + Sync {
    /// Saved position, 0 when none was saved
    fn get_progress(&self, path: &str) -> Result<usize>;

    fn save_progress(&self, path: &str, position: usize) -> Result<()>;

    fn clear_progress(&self, path: &str) -> Result<()>;
}

pub trait HighlightStore: Send + Sync {
    fn save_highlight(&self, highlight: TextHighlight) -> Result<()>;

    /// Remove by id, returning whether anything was removed
    fn remove_highlight(&self, id: Uuid) -> Result<bool>;

    fn highlights_for_book(&self, book_path: &str) -> Result<Vec<TextHighlight>>;

    fn highlights_for_chapter(
        &self,
        book_path: &str,
        chapter_index: usize,
    ) -> Result<Vec<TextHighlight>>;

    fn clear_book_highlights(&self, book_path: &str) -> Result<()>;

    /// Highlight covering `offset` in a chapter, offsets inclusive
    fn highlight_at(
        &self,
        book_path: &str,
        chapter_index: usize,
        offset: usize,
    ) -> Result<Option<TextHighlight>>;
}

pub trait PreferenceStore: Send + Sync {
    fn preferences(&self) -> Result<ReaderPreferences>;

    fn set_dark_theme(&self, dark: bool) -> Result<()>;

    /// Store a font size, clamped to the supported range; returns the stored value
    fn set_font_size(&self, size: u32) -> Result<u32>;
}

/// Everything the library and server need from a store
pub trait ReaderStore: FavoritesStore + ProgressStore + HighlightStore + PreferenceStore {}

impl<T> ReaderStore for T where T: FavoritesStore + ProgressStore + HighlightStore + PreferenceStore {}

/// Move favorite and progress state from one path to another
pub fn migrate_book<S: FavoritesStore + ProgressStore + ?Sized>(
    store: &S,
    from: &str,
    to: &str,
) -> Result<()> {
    if store.is_favorite(from)? {
        store.set_favorite(from, false)?;
        store.set_favorite(to, true)?;
    }
    let progress = store.get_progress(from)?;
    if progress > 0 {
        store.save_progress(to, progress)?;
    }
    store.clear_progress(from)
}
