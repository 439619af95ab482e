//! JSON-file store
//!
//! Each concern is one JSON document in the data directory. A document is
//! read on first use and rewritten in full after every mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::error::{Result, StoreError};
use super::highlights::{self, TextHighlight};
use super::preferences::{clamp_font_size, ReaderPreferences};
use super::{FavoritesStore, HighlightStore, PreferenceStore, ProgressStore};

const FAVORITES_FILE: &str = "favorites.json";
const PROGRESS_FILE: &str = "progress.json";
const HIGHLIGHTS_FILE: &str = "highlights.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// One lazily loaded, write-through JSON document
struct JsonDocument<T> {
    path: PathBuf,
    state: Mutex<Option<T>>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(None),
        }
    }

    fn load(&self) -> Result<T> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn persist(&self, value: &T) -> Result<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let mut state = self.state.lock();
        if state.is_none() {
            *state = Some(self.load()?);
        }
        Ok(f(state.get_or_insert_with(T::default)))
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut state = self.state.lock();
        if state.is_none() {
            *state = Some(self.load()?);
        }
        let mut next = state.as_ref().cloned().unwrap_or_default();
        let result = f(&mut next);
        self.persist(&next)?;
        *state = Some(next);
        Ok(result)
    }
}

/// Store persisting each concern to a JSON file under `data_dir`
pub struct JsonStore {
    data_dir: PathBuf,
    favorites: JsonDocument<BTreeSet<String>>,
    progress: JsonDocument<BTreeMap<String, usize>>,
    highlights: JsonDocument<Vec<TextHighlight>>,
    preferences: JsonDocument<ReaderPreferences>,
}

impl JsonStore {
    /// Create a store rooted at `data_dir`; nothing is read until first use
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        let data_dir = data_dir.into();
        Self {
            favorites: JsonDocument::new(data_dir.join(FAVORITES_FILE)),
            progress: JsonDocument::new(data_dir.join(PROGRESS_FILE)),
            highlights: JsonDocument::new(data_dir.join(HIGHLIGHTS_FILE)),
            preferences: JsonDocument::new(data_dir.join(PREFERENCES_FILE)),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl FavoritesStore for JsonStore {
    fn is_favorite(&self, path: &str) -> Result<bool> {
        self.favorites.read(|set| set.contains(path))
    }

    fn set_favorite(&self, path: &str, favorite: bool) -> Result<()> {
        self.favorites.update(|set| {
            if favorite {
                set.insert(path.to_string());
            } else {
                set.remove(path);
            }
        })
    }

    fn favorites(&self) -> Result<Vec<String>> {
        self.favorites.read(|set| set.iter().cloned().collect())
    }
}

impl ProgressStore for JsonStore {
    fn get_progress(&self, path: &str) -> Result<usize> {
        self.progress
            .read(|map| map.get(path).copied().unwrap_or(0))
    }

    fn save_progress(&self, path: &str, position: usize) -> Result<()> {
        self.progress.update(|map| {
            map.insert(path.to_string(), position);
        })
    }

    fn clear_progress(&self, path: &str) -> Result<()> {
        self.progress.update(|map| {
            map.remove(path);
        })
    }
}

impl HighlightStore for JsonStore {
    fn save_highlight(&self, highlight: TextHighlight) -> Result<()> {
        self.highlights.update(|all| all.push(highlight))
    }

    fn remove_highlight(&self, id: Uuid) -> Result<bool> {
        self.highlights.update(|all| {
            let before = all.len();
            all.retain(|h| h.id != id);
            all.len() != before
        })
    }

    fn highlights_for_book(&self, book_path: &str) -> Result<Vec<TextHighlight>> {
        self.highlights
            .read(|all| highlights::for_book(all, book_path).cloned().collect())
    }

    fn highlights_for_chapter(
        &self,
        book_path: &str,
        chapter_index: usize,
    ) -> Result<Vec<TextHighlight>> {
        self.highlights.read(|all| {
            highlights::for_chapter(all, book_path, chapter_index)
                .cloned()
                .collect()
        })
    }

    fn clear_book_highlights(&self, book_path: &str) -> Result<()> {
        self.highlights
            .update(|all| all.retain(|h| h.book_path != book_path))
    }

    fn highlight_at(
        &self,
        book_path: &str,
        chapter_index: usize,
        offset: usize,
    ) -> Result<Option<TextHighlight>> {
        self.highlights.read(|all| {
            highlights::at_position(all, book_path, chapter_index, offset).cloned()
        })
    }
}

impl PreferenceStore for JsonStore {
    fn preferences(&self) -> Result<ReaderPreferences> {
        self.preferences.read(|prefs| *prefs)
    }

    fn set_dark_theme(&self, dark: bool) -> Result<()> {
        self.preferences.update(|prefs| prefs.dark_theme = dark)
    }

    fn set_font_size(&self, size: u32) -> Result<u32> {
        let size = clamp_font_size(size);
        self.preferences.update(|prefs| {
            prefs.font_size = size;
            size
        })
    }
}
