//! Core content types
//!
//! Format-agnostic types shared by every extractor.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::classify::classify;

/// Content type derived from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Pdf,
    Epub,
    ComicZip,
    ComicRar,
    Unknown,
}

impl ContentType {
    /// Whether this type extracts to page images rather than text chapters
    pub fn is_image_archive(self) -> bool {
        matches!(self, Self::ComicZip | Self::ComicRar)
    }

    /// MIME type used when serving the source file itself
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Epub => "application/epub+zip",
            Self::ComicZip => "application/vnd.comicbook+zip",
            Self::ComicRar => "application/vnd.comicbook-rar",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// A file on durable storage, supplied by the caller per request
///
/// Identity is the path. The byte size is read lazily because most callers
/// never need it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including extension, empty when the path has none
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without its extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Size in bytes, if the file can be stat'ed
    pub fn size(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    pub fn content_type(&self) -> ContentType {
        classify(&self.file_name())
    }
}

/// Table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterInfo {
    /// Display title
    pub title: String,
    /// Zero-based index into the chapter sequence
    pub index: usize,
}

impl ChapterInfo {
    pub fn new(title: impl Into<String>, index: usize) -> Self {
        Self {
            title: title.into(),
            index,
        }
    }

    /// One "Chapter N" entry per chapter, in sequence order
    pub fn placeholders(count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| Self::new(format!("Chapter {}", i + 1), i))
            .collect()
    }
}

/// Uniform result of opening a source file
///
/// Successful variants are never empty: an extractor that finds nothing
/// returns `Failure` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtractionResult {
    /// Text chapters (HTML fragments for EPUB, plain text for PDF pages)
    #[serde(rename_all = "camelCase")]
    TextBook {
        chapters: Vec<String>,
        toc: Vec<ChapterInfo>,
    },
    /// Absolute paths of cached page images in reading order
    #[serde(rename_all = "camelCase")]
    ImagePages { pages: Vec<PathBuf> },
    /// Human-readable diagnostic
    #[serde(rename_all = "camelCase")]
    Failure { message: String },
}

impl ExtractionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Number of navigable units (chapters or pages)
    pub fn len(&self) -> usize {
        match self {
            Self::TextBook { chapters, .. } => chapters.len(),
            Self::ImagePages { pages } => pages.len(),
            Self::Failure { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
