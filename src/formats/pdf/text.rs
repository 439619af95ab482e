//! Per-page PDF text extraction

use mupdf::Document;

use crate::content::{ExtractError, Result};

/// Source of page text, implemented by MuPDF documents
pub trait PageText {
    fn page_count(&self) -> Result<usize>;
    fn page_text(&self, index: usize) -> Result<String>;
}

impl PageText for Document {
    fn page_count(&self) -> Result<usize> {
        Ok(Document::page_count(self)? as usize)
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page = self.load_page(index as i32)?;
        Ok(page.to_text()?)
    }
}

/// One chapter per page with text, trimmed
///
/// Blank pages are skipped. A page that fails to load fails the whole
/// document.
pub fn collect_text_chapters<D: PageText + ?Sized>(doc: &D) -> Result<Vec<String>> {
    let count = doc.page_count()?;
    let mut chapters = Vec::with_capacity(count);
    for index in 0..count {
        let text = doc.page_text(index)?;
        let text = text.trim();
        if !text.is_empty() {
            chapters.push(text.to_string());
        }
    }

    if chapters.is_empty() {
        return Err(ExtractError::EmptyPdf);
    }
    Ok(chapters)
}
