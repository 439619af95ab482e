//! Cover thumbnails
//!
//! Covers live next to their source file in a `Covers/` directory, named
//! after the source's stem with a `.jpg` extension.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::content::{ContentType, ExtractError, Result, SourceFile};
use crate::formats::{cbr, cbz, pdf};

/// Directory beside each source holding its cover
pub const COVERS_DIR: &str = "Covers";

/// Default rendered cover width in pixels
pub const DEFAULT_COVER_WIDTH: u32 = 600;

/// How extracted cover bytes are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMode {
    /// Archive images unmodified
    Raw,
    /// Always JPEG
    Jpeg,
}

/// Extracts and persists cover images
#[derive(Debug, Clone)]
pub struct CoverExtractor {
    width: u32,
    quality: u8,
}

impl Default for CoverExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_COVER_WIDTH, pdf::JPEG_QUALITY)
    }
}

impl CoverExtractor {
    pub fn new(width: u32, quality: u8) -> Self {
        Self {
            width: width.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// `<dir>/Covers/<stem>.jpg` for a source at `<dir>/<stem>.<ext>`
    pub fn cover_path(source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        source
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(COVERS_DIR)
            .join(format!("{stem}.jpg"))
    }

    pub fn has_cover(source: &Path) -> bool {
        Self::cover_path(source).is_file()
    }

    /// Cover bytes for `source`, or `None` when it has no usable image
    pub fn extract_cover(&self, source: &SourceFile, mode: CoverMode) -> Option<Vec<u8>> {
        match self.try_extract(source, mode) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Cover extraction failed for {}: {}", source.path().display(), e);
                None
            }
        }
    }

    fn try_extract(&self, source: &SourceFile, mode: CoverMode) -> Result<Option<Vec<u8>>> {
        let path = source.path();
        let raw = match (source.content_type(), mode) {
            (ContentType::Pdf, _) => {
                return pdf::render_cover(path, Some(self.width), self.quality).map(Some);
            }
            (ContentType::Epub, CoverMode::Raw) => return Ok(None),
            (ContentType::Epub | ContentType::ComicZip, _) => cbz::first_image(path)?,
            (ContentType::ComicRar, _) => cbr::first_image(path)?,
            (ContentType::Unknown, _) => {
                return Err(ExtractError::UnsupportedFormat(source.file_name()))
            }
        };

        match (raw, mode) {
            (Some(bytes), CoverMode::Jpeg) => {
                let decoded = image::load_from_memory(&bytes)?;
                pdf::encode_jpeg(&decoded, self.quality).map(Some)
            }
            (raw, _) => Ok(raw),
        }
    }

    /// Extract a JPEG cover and store it at [`Self::cover_path`]
    ///
    /// Returns true if a cover exists afterwards. An existing cover is kept.
    pub fn extract_and_save(&self, source: &SourceFile) -> bool {
        let target = Self::cover_path(source.path());
        if target.is_file() {
            return true;
        }

        let Some(bytes) = self.extract_cover(source, CoverMode::Jpeg) else {
            return false;
        };
        match write_cover(&target, &mut bytes.as_slice()) {
            Ok(()) => {
                tracing::debug!("Saved cover {}", target.display());
                true
            }
            Err(e) => {
                tracing::warn!("Could not save cover {}: {}", target.display(), e);
                false
            }
        }
    }

    /// Store a user-supplied image as the cover, replacing any existing one
    pub fn save_custom_cover(&self, source: &Path, reader: &mut dyn Read) -> Result<PathBuf> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let decoded = image::load_from_memory(&bytes)?;
        let jpeg = pdf::encode_jpeg(&decoded, self.quality)?;

        let target = Self::cover_path(source);
        write_cover(&target, &mut jpeg.as_slice())?;
        Ok(target)
    }
}

fn write_cover(target: &Path, reader: &mut dyn Read) -> io::Result<()> {
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut partial = target.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);
    {
        let mut out = fs::File::create(&partial)?;
        io::copy(reader, &mut out)?;
    }
    fs::rename(&partial, target)
}
