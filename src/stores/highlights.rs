//! Text highlights

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{Result, StoreError};

/// Default highlight color (light orange)
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFB74D";

/// A marked span of text inside one chapter of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextHighlight {
    pub id: Uuid,
    pub book_path: String,
    pub chapter_index: usize,
    pub selected_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    pub color: String,
}

impl TextHighlight {
    pub fn new(
        book_path: impl Into<String>,
        chapter_index: usize,
        selected_text: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
    ) -> Result<Self> {
        if end_offset < start_offset {
            return Err(StoreError::InvalidRange {
                start: start_offset,
                end: end_offset,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            book_path: book_path.into(),
            chapter_index,
            selected_text: selected_text.into(),
            start_offset,
            end_offset,
            timestamp: Utc::now().timestamp_millis(),
            color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        })
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether `offset` falls inside this highlight, both ends inclusive
    pub fn covers(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset <= self.end_offset
    }

    pub fn belongs_to(&self, book_path: &str, chapter_index: usize) -> bool {
        self.book_path == book_path && self.chapter_index == chapter_index
    }
}

/// Highlights of one book, in insertion order
pub fn for_book<'a>(
    highlights: &'a [TextHighlight],
    book_path: &'a str,
) -> impl Iterator<Item = &'a TextHighlight> {
    highlights.iter().filter(move |h| h.book_path == book_path)
}

/// Highlights of one chapter, in insertion order
pub fn for_chapter<'a>(
    highlights: &'a [TextHighlight],
    book_path: &'a str,
    chapter_index: usize,
) -> impl Iterator<Item = &'a TextHighlight> {
    highlights
        .iter()
        .filter(move |h| h.belongs_to(book_path, chapter_index))
}

/// First highlight in a chapter covering `offset`
pub fn at_position<'a>(
    highlights: &'a [TextHighlight],
    book_path: &str,
    chapter_index: usize,
    offset: usize,
) -> Option<&'a TextHighlight> {
    highlights
        .iter()
        .find(|h| h.belongs_to(book_path, chapter_index) && h.covers(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_highlight_defaults() {
        let h = TextHighlight::new("/b.epub", 2, "quote", 10, 15).unwrap();
        assert_eq!(h.color, DEFAULT_HIGHLIGHT_COLOR);
        assert!(h.timestamp > 0);
        assert!(h.covers(10) && h.covers(15));
        assert!(!h.covers(9) && !h.covers(16));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            TextHighlight::new("/b.epub", 0, "x", 5, 4),
            Err(StoreError::InvalidRange { start: 5, end: 4 })
        ));
    }

    #[test]
    fn test_queries() {
        let all = vec![
            TextHighlight::new("/a.epub", 0, "one", 0, 3).unwrap(),
            TextHighlight::new("/a.epub", 1, "two", 5, 9).unwrap(),
            TextHighlight::new("/b.epub", 1, "three", 5, 9).unwrap(),
        ];
        assert_eq!(for_book(&all, "/a.epub").count(), 2);
        assert_eq!(for_chapter(&all, "/a.epub", 1).count(), 1);
        assert_eq!(
            at_position(&all, "/b.epub", 1, 9).map(|h| h.selected_text.as_str()),
            Some("three")
        );
        assert!(at_position(&all, "/b.epub", 0, 5).is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let h = TextHighlight::new("/a.epub", 0, "one", 0, 3).unwrap();
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["bookPath"], "/a.epub");
        assert_eq!(json["chapterIndex"], 0);
        assert_eq!(json["color"], "#FFB74D");
    }
}
