//! Format dispatch
//!
//! `ContentLoader` is the single entry point for opening a source file. It
//! never returns an error: every failure becomes `ExtractionResult::Failure`.

use std::path::{Path, PathBuf};

use super::cache::PageCache;
use super::error::{ExtractError, Result};
use super::types::{ChapterInfo, ContentType, ExtractionResult, SourceFile};
use crate::formats::{cbr, cbz, epub, pdf};

/// Opens source files and caches comic pages under `cache_root`
#[derive(Debug, Clone)]
pub struct ContentLoader {
    cache_root: PathBuf,
}

impl ContentLoader {
    /// Relative roots are resolved against the working directory once, so
    /// every page path handed out is absolute
    pub fn new<P: Into<PathBuf>>(cache_root: P) -> Self {
        let cache_root = cache_root.into();
        let cache_root = std::path::absolute(&cache_root).unwrap_or(cache_root);
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Page cache used for `source`
    pub fn cache_for(&self, source: &SourceFile) -> PageCache {
        PageCache::for_source(&self.cache_root, &source.file_name())
    }

    /// Open `source` on the current thread
    pub fn load_blocking(&self, source: &SourceFile) -> ExtractionResult {
        match self.try_load(source) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", source.path().display(), e);
                ExtractionResult::failure(e.to_string())
            }
        }
    }

    /// Open `source` on a blocking worker
    pub async fn load(&self, source: SourceFile) -> ExtractionResult {
        let loader = self.clone();
        tokio::task::spawn_blocking(move || loader.load_blocking(&source))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Extraction task join error: {}", e);
                ExtractionResult::failure(ExtractError::Task(e.to_string()).to_string())
            })
    }

    fn try_load(&self, source: &SourceFile) -> Result<ExtractionResult> {
        let content_type = source.content_type();

        if content_type.is_image_archive() {
            let cache = self.cache_for(source);
            let cached = cache.cached_pages();
            if !cached.is_empty() {
                tracing::debug!("Serving {} cached pages for {}", cached.len(), source.file_name());
                return Ok(ExtractionResult::ImagePages { pages: cached });
            }
        }

        tracing::debug!("Extracting {} as {:?}", source.path().display(), content_type);
        match content_type {
            ContentType::Pdf => {
                let chapters = pdf::extract_text(source.path())?;
                let toc = ChapterInfo::placeholders(chapters.len());
                Ok(ExtractionResult::TextBook { chapters, toc })
            }
            ContentType::Epub => {
                let text = epub::extract(source.path())?;
                Ok(ExtractionResult::TextBook {
                    chapters: text.chapters,
                    toc: text.toc,
                })
            }
            ContentType::ComicZip => {
                let pages = cbz::extract(source.path(), &self.cache_for(source))?;
                Ok(ExtractionResult::ImagePages { pages })
            }
            ContentType::ComicRar => {
                let pages = cbr::extract(source.path(), &self.cache_for(source))?;
                Ok(ExtractionResult::ImagePages { pages })
            }
            ContentType::Unknown => Err(ExtractError::UnsupportedFormat(source.file_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cbz::tests::write_zip;
    use crate::formats::epub::tests::{build_epub, chapter, opf, CONTAINER};
    use tempfile::TempDir;

    fn loader(temp_dir: &TempDir) -> ContentLoader {
        ContentLoader::new(temp_dir.path().join("cache"))
    }

    #[test]
    fn test_unknown_format_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("notes.txt");
        std::fs::write(&source_path, "plain").unwrap();

        let result = loader(&temp_dir).load_blocking(&SourceFile::new(&source_path));
        assert_eq!(
            result,
            ExtractionResult::failure("unknown or unsupported file format: notes.txt")
        );
    }

    #[test]
    fn test_missing_pdf_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            loader(&temp_dir).load_blocking(&SourceFile::new(temp_dir.path().join("gone.pdf")));
        assert!(result.is_failure());
    }

    #[test]
    fn test_cbz_pages_then_cache_hit() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("Issue 7.CBZ");
        let one: &[u8] = b"one";
        let two: &[u8] = b"two";
        write_zip(&source_path, &[("p2.png", two), ("p1.jpg", one)]);
        let source = SourceFile::new(&source_path);
        let loader = loader(&temp_dir);

        let first = loader.load_blocking(&source);
        let ExtractionResult::ImagePages { pages } = &first else {
            panic!("expected pages, got {first:?}");
        };
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.starts_with(loader.cache_for(&source).dir())));

        std::fs::remove_file(&source_path).unwrap();
        assert_eq!(loader.load_blocking(&source), first);
    }

    #[test]
    fn test_relative_cache_root_yields_absolute_pages() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("issue.cbz");
        let one: &[u8] = b"one";
        write_zip(&source_path, &[("p1.jpg", one)]);
        let source = SourceFile::new(&source_path);

        let cache_dir = tempfile::Builder::new()
            .prefix("readlab-cache")
            .tempdir_in(".")
            .unwrap();
        let relative = Path::new(".").join(cache_dir.path().file_name().unwrap());
        let loader = ContentLoader::new(&relative);
        assert!(loader.cache_root().is_absolute());

        let first = loader.load_blocking(&source);
        let ExtractionResult::ImagePages { pages } = &first else {
            panic!("expected pages, got {first:?}");
        };
        assert!(pages.iter().all(|p| p.is_absolute()));

        let ExtractionResult::ImagePages { pages } = loader.load_blocking(&source) else {
            panic!("expected cached pages");
        };
        assert!(pages.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_epub_book() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("novel.epub");
        let bytes = build_epub(&[
            ("META-INF/container.xml", CONTAINER.to_string()),
            ("OEBPS/content.opf", opf(2)),
            ("OEBPS/text/ch0.xhtml", chapter("<h1>One</h1>")),
            ("OEBPS/text/ch1.xhtml", chapter("<h1>Two</h1>")),
        ]);
        std::fs::write(&source_path, bytes).unwrap();

        let result = loader(&temp_dir).load_blocking(&SourceFile::new(&source_path));
        match result {
            ExtractionResult::TextBook { chapters, toc } => {
                assert_eq!(chapters, vec!["<h1>One</h1>", "<h1>Two</h1>"]);
                assert_eq!(toc, ChapterInfo::placeholders(2));
            }
            other => panic!("expected text book, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_async_load_runs_off_thread() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("empty.cbz");
        let readme: &[u8] = b"no pages here";
        write_zip(&source_path, &[("readme.txt", readme)]);

        let result = loader(&temp_dir).load(SourceFile::new(&source_path)).await;
        assert_eq!(result, ExtractionResult::failure("no images found"));
    }
}
