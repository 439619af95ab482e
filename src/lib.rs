//! ReadLab Library
//!
//! Content ingestion for a personal reading app: PDF, EPUB, CBZ and CBR
//! files are turned into text chapters or cached page images, with covers,
//! reader state stores and narration helpers on top. The HTTP server binary
//! is in main.rs.
//!
//! # Modules
//!
//! - `content`: Format classification, the uniform extraction result, page cache
//! - `formats`: Per-format extractors
//! - `covers`: Cover thumbnails beside each source file
//! - `library`: Shelves on disk, import, rename, delete
//! - `stores`: Favorites, progress, highlights, preferences
//! - `narration`: Sentence splitting and the narrator state machine

pub mod config;
pub mod content;
pub mod covers;
pub mod error;
pub mod formats;
pub mod library;
pub mod narration;
pub mod routes;
pub mod state;
pub mod stores;

pub use routes::app;
