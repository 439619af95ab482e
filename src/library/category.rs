//! Library shelves

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level shelf a file is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Book,
    Comic,
    Manga,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Book, Category::Comic, Category::Manga];

    /// Directory name under the library root
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Book => "Books",
            Self::Comic => "Comics",
            Self::Manga => "Mangas",
        }
    }

    /// Lenient parse used for imports; anything unrecognized is a comic
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Comic)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Comic
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Book => "book",
            Self::Comic => "comic",
            Self::Manga => "manga",
        };
        f.write_str(label)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" | "books" => Ok(Self::Book),
            "comic" | "comics" => Ok(Self::Comic),
            "manga" | "mangas" => Ok(Self::Manga),
            other => Err(format!("unknown category: {other}")),
        }
    }
}
