//! Reader preferences

use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u32 = 18;
pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 36;
pub const FONT_SIZE_STEP: u32 = 2;

/// Global reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderPreferences {
    pub dark_theme: bool,
    pub font_size: u32,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            dark_theme: true,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Clamp a font size into the supported range
pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

pub fn increase_font_size(size: u32) -> u32 {
    clamp_font_size(size.saturating_add(FONT_SIZE_STEP))
}

pub fn decrease_font_size(size: u32) -> u32 {
    clamp_font_size(size.saturating_sub(FONT_SIZE_STEP))
}
