//! Content ingestion core
//!
//! Turns a source file into either text chapters with a table of contents or
//! an ordered list of cached page images. See [`ContentLoader`].

mod cache;
mod classify;
mod error;
mod loader;
mod types;

pub use cache::{cache_key, page_file_name, PageCache, CONTENT_CACHE_DIR};
pub use classify::{classify, image_extension, is_image_name};
pub use error::{ExtractError, FailureKind, Result};
pub use loader::ContentLoader;
pub use types::{ChapterInfo, ContentType, ExtractionResult, SourceFile};
