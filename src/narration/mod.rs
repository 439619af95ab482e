//! Read-aloud support
//!
//! Chapters are reduced to plain text, split into sentences and fed one at a
//! time to a [`SpeechEngine`] by the [`Narrator`].

mod narrator;
mod sentences;

pub use crate::formats::epub::plain_text;
pub use narrator::{NarrationEvent, Narrator, SpeechEngine, MAX_RATE, MIN_RATE};
pub use sentences::split_sentences;

/// Sentences of one chapter's HTML, in reading order
pub fn chapter_sentences(html: &str) -> Vec<String> {
    split_sentences(&plain_text(html))
}
