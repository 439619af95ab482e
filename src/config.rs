//! Configuration management for ReadLab

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::covers::DEFAULT_COVER_WIDTH;
use crate::formats::pdf::JPEG_QUALITY;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub covers: CoverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Holds the `Books`, `Comics` and `Mangas` directories
    pub root: PathBuf,
    /// Extracted comic pages
    pub cache_dir: PathBuf,
    /// Favorites, progress, highlights and preferences
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverConfig {
    pub width: u32,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            library: LibraryConfig {
                root: PathBuf::from("./library"),
                cache_dir: PathBuf::from("./cache"),
                data_dir: PathBuf::from("./data"),
            },
            covers: CoverConfig {
                width: DEFAULT_COVER_WIDTH,
                jpeg_quality: JPEG_QUALITY,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(e),
        })
    }

    /// Build from `lookup`, falling back to [`Config::default`] per key
    fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<Option<String>, env::VarError>,
    {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST")?.unwrap_or(defaults.server.host),
                port: lookup("SERVER_PORT")?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            library: LibraryConfig {
                root: lookup("LIBRARY_ROOT")?
                    .map(PathBuf::from)
                    .unwrap_or(defaults.library.root),
                cache_dir: lookup("CACHE_DIR")?
                    .map(PathBuf::from)
                    .unwrap_or(defaults.library.cache_dir),
                data_dir: lookup("DATA_DIR")?
                    .map(PathBuf::from)
                    .unwrap_or(defaults.library.data_dir),
            },
            covers: CoverConfig {
                width: lookup("COVER_WIDTH")?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.covers.width),
                jpeg_quality: lookup("COVER_JPEG_QUALITY")?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.covers.jpeg_quality),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
