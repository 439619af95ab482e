//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::content::ContentLoader;
use crate::covers::CoverExtractor;
use crate::error::Result;
use crate::library::{path_key, LibraryLayout};
use crate::stores::ReaderStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    layout: LibraryLayout,
    loader: ContentLoader,
    covers: CoverExtractor,
    store: Arc<dyn ReaderStore>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Directory locations and cover settings come from `config`; the store
    /// is injected so tests can run against memory.
    pub fn new(config: Config, store: Arc<dyn ReaderStore>) -> Self {
        let layout = LibraryLayout::new(&config.library.root);
        let loader = ContentLoader::new(&config.library.cache_dir);
        let covers = CoverExtractor::new(config.covers.width, config.covers.jpeg_quality);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                layout,
                loader,
                covers,
                store,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the library layout
    pub fn layout(&self) -> &LibraryLayout {
        &self.inner.layout
    }

    /// Get the content loader
    pub fn loader(&self) -> &ContentLoader {
        &self.inner.loader
    }

    pub fn covers(&self) -> &CoverExtractor {
        &self.inner.covers
    }

    /// Get the reader store
    pub fn store(&self) -> &dyn ReaderStore {
        self.inner.store.as_ref()
    }

    /// Store key for a library file given by the client
    ///
    /// The path must name an existing file inside the library root.
    pub fn book_key(&self, path: &str) -> Result<String> {
        let resolved = self.inner.layout.resolve(Path::new(path))?;
        Ok(path_key(&resolved))
    }
}
