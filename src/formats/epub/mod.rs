//! EPUB text extraction
//!
//! An EPUB is a ZIP archive holding a package document (OPF) that lists the
//! chapter files in reading order. Each chapter is normalized to a simple
//! HTML fragment; chapters without visible text are dropped.

pub mod html;
pub mod package;

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::content::{ChapterInfo, ExtractError, Result};

pub use html::{normalize_chapter, plain_text, reconcile_toc};
pub use package::Package;

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Chapters and TOC extracted from one EPUB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubText {
    pub chapters: Vec<String>,
    pub toc: Vec<ChapterInfo>,
}

/// Reader over an EPUB archive
pub struct EpubExtractor<R> {
    archive: ZipArchive<R>,
}

impl EpubExtractor<File> {
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> EpubExtractor<R> {
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Extract normalized chapters and the reconciled TOC
    pub fn extract(&mut self) -> Result<EpubText> {
        let opf_path = self.find_package()?;
        let opf = self
            .read_entry(&opf_path)?
            .ok_or(ExtractError::PackageNotFound)?;
        let package = package::parse_package(&opf)?;
        let opf_dir = package::parent_dir(&opf_path).to_string();

        let titles = self.ncx_titles();

        let mut chapters = Vec::new();
        for href in package.spine_hrefs() {
            let Some(raw) = self.read_first(&package::candidate_paths(&opf_dir, href))? else {
                tracing::debug!("Spine entry missing from archive: {}", href);
                continue;
            };
            if let Some(chapter) = normalize_chapter(&raw) {
                chapters.push(chapter);
            }
        }

        if chapters.is_empty() {
            return Err(ExtractError::NoText);
        }

        let toc = reconcile_toc(titles, chapters.len());
        Ok(EpubText { chapters, toc })
    }

    /// Locate the OPF package document
    ///
    /// `container.xml` is authoritative; when it is missing or unusable the
    /// first `.opf` entry is taken.
    pub fn find_package(&mut self) -> Result<String> {
        match self.read_entry(CONTAINER_PATH) {
            Ok(Some(xml)) => match package::parse_container(&xml) {
                Ok(Some(path)) => return Ok(path),
                Ok(None) => tracing::debug!("container.xml has no rootfile"),
                Err(e) => tracing::debug!("Unparsable container.xml: {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::debug!("Unreadable container.xml: {}", e),
        }

        self.archive
            .file_names()
            .find(|name| name.ends_with(".opf"))
            .map(str::to_string)
            .ok_or(ExtractError::PackageNotFound)
    }

    /// Titles from the first `.ncx` entry, empty when absent or unreadable
    fn ncx_titles(&mut self) -> Vec<String> {
        let Some(name) = self
            .archive
            .file_names()
            .find(|name| name.ends_with(".ncx"))
            .map(str::to_string)
        else {
            return Vec::new();
        };

        let parsed = self
            .read_entry(&name)
            .and_then(|xml| match xml {
                Some(xml) => package::parse_ncx_titles(&xml),
                None => Ok(Vec::new()),
            });
        match parsed {
            Ok(titles) => titles,
            Err(e) => {
                tracing::warn!("Ignoring unreadable NCX {}: {}", name, e);
                Vec::new()
            }
        }
    }

    /// Entry contents as lossy UTF-8, `None` if no such entry
    fn read_entry(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Contents of the first name in `candidates` present in the archive
    fn read_first(&mut self, candidates: &[String]) -> Result<Option<String>> {
        for name in candidates {
            if let Some(text) = self.read_entry(name)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

/// Extract chapters and TOC from the EPUB at `path`
pub fn extract(path: &Path) -> Result<EpubText> {
    EpubExtractor::open(path)?.extract()
}
