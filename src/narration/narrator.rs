//! Narration state machine
//!
//! The narrator owns playback position and drives a [`SpeechEngine`]. The
//! host reports engine progress through [`Narrator::utterance_done`] and
//! [`Narrator::utterance_failed`]; every call returns the events it caused.

use serde::Serialize;

use super::sentences::split_sentences;
use crate::formats::epub::plain_text;

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;

/// Text-to-speech backend
pub trait SpeechEngine {
    /// Speak `text`, replacing anything queued
    fn speak(&mut self, utterance_id: &str, text: &str);
    fn stop(&mut self);
    fn set_rate(&mut self, rate: f32);
    fn set_pitch(&mut self, pitch: f32);
}

/// Observable narration changes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum NarrationEvent {
    #[serde(rename_all = "camelCase")]
    ChapterChanged { chapter: usize },
    #[serde(rename_all = "camelCase")]
    SentenceStarted { chapter: usize, sentence: usize },
    /// Last sentence of the last chapter finished
    Finished,
    /// The engine reported an error; playback paused
    Failed,
}

pub struct Narrator<E: SpeechEngine> {
    engine: E,
    chapters: Vec<String>,
    chapter: usize,
    sentences: Vec<String>,
    sentence: usize,
    playing: bool,
    rate: f32,
    pitch: f32,
}

impl<E: SpeechEngine> Narrator<E> {
    pub fn new(mut engine: E) -> Self {
        engine.set_rate(1.0);
        engine.set_pitch(1.0);
        Self {
            engine,
            chapters: Vec::new(),
            chapter: 0,
            sentences: Vec::new(),
            sentence: 0,
            playing: false,
            rate: 1.0,
            pitch: 1.0,
        }
    }

    /// Load chapter HTML and position at the start of the first chapter
    pub fn set_chapters(&mut self, chapters: Vec<String>) {
        self.engine.stop();
        self.playing = false;
        self.chapters = chapters;
        self.chapter = 0;
        self.sentences.clear();
        self.sentence = 0;
        if !self.chapters.is_empty() {
            self.prepare_chapter(0);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_chapter(&self) -> usize {
        self.chapter
    }

    pub fn current_sentence(&self) -> usize {
        self.sentence
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start or resume at the current sentence
    pub fn play(&mut self) -> Vec<NarrationEvent> {
        if self.chapters.is_empty() {
            tracing::warn!("Narration requested with no chapters loaded");
            return Vec::new();
        }
        self.playing = true;
        let mut events = Vec::new();
        self.speak_current(&mut events);
        events
    }

    /// Stop speaking, keeping the position
    pub fn pause(&mut self) {
        self.engine.stop();
        self.playing = false;
    }

    /// Stop speaking and rewind to the start of the current chapter
    pub fn stop(&mut self) {
        self.engine.stop();
        self.playing = false;
        self.prepare_chapter(self.chapter);
    }

    /// The engine finished `utterance_id`; advance if it is still current
    pub fn utterance_done(&mut self, utterance_id: &str) -> Vec<NarrationEvent> {
        let mut events = Vec::new();
        if !self.playing || utterance_id != self.utterance_id() {
            return events;
        }
        self.sentence += 1;
        self.speak_current(&mut events);
        events
    }

    pub fn utterance_failed(&mut self, utterance_id: &str) -> Vec<NarrationEvent> {
        tracing::warn!("Speech engine failed on {}", utterance_id);
        self.playing = false;
        vec![NarrationEvent::Failed]
    }

    pub fn next_chapter(&mut self) -> Vec<NarrationEvent> {
        let mut events = Vec::new();
        self.advance_chapter(&mut events);
        events
    }

    pub fn previous_chapter(&mut self) -> Vec<NarrationEvent> {
        let mut events = Vec::new();
        if self.chapter == 0 || self.chapters.is_empty() {
            return events;
        }
        self.prepare_chapter(self.chapter - 1);
        events.push(NarrationEvent::ChapterChanged {
            chapter: self.chapter,
        });
        if self.playing {
            self.speak_current(&mut events);
        }
        events
    }

    /// Jump to `chapter`, resuming playback if it was playing
    pub fn seek_chapter(&mut self, chapter: usize) -> Vec<NarrationEvent> {
        let mut events = Vec::new();
        if chapter >= self.chapters.len() {
            return events;
        }
        let was_playing = self.playing;
        self.pause();
        self.prepare_chapter(chapter);
        events.push(NarrationEvent::ChapterChanged { chapter });
        if was_playing {
            events.extend(self.play());
        }
        events
    }

    /// Set the speech rate, clamped to 0.5..=2.0; returns the applied value
    pub fn set_rate(&mut self, rate: f32) -> f32 {
        self.rate = clamp_speech(rate);
        self.engine.set_rate(self.rate);
        self.rate
    }

    /// Set the voice pitch, clamped to 0.5..=2.0; returns the applied value
    pub fn set_pitch(&mut self, pitch: f32) -> f32 {
        self.pitch = clamp_speech(pitch);
        self.engine.set_pitch(self.pitch);
        self.pitch
    }

    fn utterance_id(&self) -> String {
        format!("sentence_{}_{}", self.chapter, self.sentence)
    }

    fn prepare_chapter(&mut self, chapter: usize) {
        let Some(html) = self.chapters.get(chapter) else {
            return;
        };
        self.sentences = split_sentences(&plain_text(html));
        self.chapter = chapter;
        self.sentence = 0;
        tracing::debug!(
            "Prepared chapter {} with {} sentences",
            chapter,
            self.sentences.len()
        );
    }

    fn speak_current(&mut self, events: &mut Vec<NarrationEvent>) {
        if self.sentence >= self.sentences.len() {
            self.advance_chapter(events);
            return;
        }
        let id = self.utterance_id();
        self.engine.speak(&id, &self.sentences[self.sentence]);
        events.push(NarrationEvent::SentenceStarted {
            chapter: self.chapter,
            sentence: self.sentence,
        });
    }

    /// Move to the next chapter with sentences, or finish the book
    fn advance_chapter(&mut self, events: &mut Vec<NarrationEvent>) {
        let mut next = self.chapter + 1;
        while next < self.chapters.len() {
            self.prepare_chapter(next);
            events.push(NarrationEvent::ChapterChanged { chapter: next });
            if !self.playing {
                return;
            }
            if !self.sentences.is_empty() {
                self.speak_current(events);
                return;
            }
            next += 1;
        }

        let was_playing = self.playing;
        self.stop();
        if was_playing {
            events.push(NarrationEvent::Finished);
        }
    }
}

fn clamp_speech(value: f32) -> f32 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MIN_RATE, MAX_RATE)
}
