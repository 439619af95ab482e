//! PDF support via MuPDF
//!
//! Text chapters come from each page's text layer. Covers are the first
//! page rendered to JPEG.

pub mod render;
pub mod text;

use std::path::Path;

use mupdf::Document;

use crate::content::{ExtractError, Result};

pub use render::{encode_jpeg, render_first_page, JPEG_QUALITY};
pub use text::{collect_text_chapters, PageText};

/// Open a PDF with MuPDF
///
/// The handle is released when the returned `Document` is dropped.
pub fn open(path: &Path) -> Result<Document> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ExtractError::Pdf(format!("non UTF-8 path: {}", path.display())))?;
    Ok(Document::open(path_str)?)
}

/// One text chapter per non-blank page
pub fn extract_text(path: &Path) -> Result<Vec<String>> {
    let doc = open(path)?;
    collect_text_chapters(&doc)
}

/// First page as JPEG, optionally scaled to `target_width`
pub fn render_cover(path: &Path, target_width: Option<u32>, quality: u8) -> Result<Vec<u8>> {
    let doc = open(path)?;
    render_first_page(&doc, target_width, quality)
}
