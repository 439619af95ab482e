//! On-disk page cache for image archives
//!
//! Each source file gets one directory under `<root>/content_cache/`, named
//! from a hash of the file name. Pages are stored as `0000.ext`, `0001.ext`,
//! ... so a plain name sort gives reading order.
//!
//! Entries are never invalidated. Replacing an archive at the same name keeps
//! serving the old pages until the directory is removed by hand.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::classify::is_image_name;

/// Directory under the cache root holding all page caches
pub const CONTENT_CACHE_DIR: &str = "content_cache";

/// Page cache for a single source file
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    /// Cache directory for `file_name` under `cache_root`
    pub fn for_source(cache_root: &Path, file_name: &str) -> Self {
        Self {
            dir: cache_root.join(CONTENT_CACHE_DIR).join(cache_key(file_name)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Previously extracted pages, sorted by name
    ///
    /// Returns an empty list when the directory does not exist yet.
    pub fn cached_pages(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut pages: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| is_image_name(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .collect();

        pages.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        pages
    }

    /// Destination path for the page at `index`
    pub fn page_path(&self, index: usize, extension: &str) -> PathBuf {
        self.dir.join(page_file_name(index, extension))
    }

    /// Create the cache directory if needed
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Write a page from `reader` to `path`
    ///
    /// Bytes land in a `.part` file first and are renamed into place, so a
    /// concurrent reader sees either no page or a complete one.
    pub fn write_page(&self, path: &Path, reader: &mut dyn Read) -> io::Result<u64> {
        let mut partial = path.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let written = {
            let mut out = fs::File::create(&partial)?;
            io::copy(reader, &mut out)?
        };
        fs::rename(&partial, path)?;
        Ok(written)
    }

    /// Remove the whole cache directory
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Fixed-width page file name: `0000.jpg`, `0001.png`, ...
pub fn page_file_name(index: usize, extension: &str) -> String {
    format!("{:04}.{}", index, extension)
}

/// Deterministic cache key for a file name (16 hex chars of SHA-256)
pub fn cache_key(file_name: &str) -> String {
    let digest = Sha256::digest(file_name.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = cache_key("Saga 01.cbz");
        assert_eq!(a, cache_key("Saga 01.cbz"));
        assert_ne!(a, cache_key("Saga 02.cbz"));
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_page_file_name_is_zero_padded() {
        assert_eq!(page_file_name(0, "jpg"), "0000.jpg");
        assert_eq!(page_file_name(42, "png"), "0042.png");
        assert_eq!(page_file_name(12345, "webp"), "12345.webp");
    }

    #[test]
    fn test_cached_pages_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache = PageCache::for_source(temp_dir.path(), "missing.cbz");
        assert!(cache.cached_pages().is_empty());
        assert!(!cache.dir().exists());
    }

    #[test]
    fn test_cached_pages_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let cache = PageCache::for_source(temp_dir.path(), "issue.cbz");
        cache.ensure_dir().unwrap();

        for name in ["0002.png", "0000.jpg", "notes.txt", "0001.jpg", "0003.jpg.part"] {
            fs::write(cache.dir().join(name), b"x").unwrap();
        }

        let names: Vec<String> = cache
            .cached_pages()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["0000.jpg", "0001.jpg", "0002.png"]);
    }

    #[test]
    fn test_write_page_leaves_no_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = PageCache::for_source(temp_dir.path(), "issue.cbz");
        cache.ensure_dir().unwrap();

        let path = cache.page_path(0, "jpg");
        let written = cache.write_page(&path, &mut &b"page bytes"[..]).unwrap();

        assert_eq!(written, 10);
        assert_eq!(fs::read(&path).unwrap(), b"page bytes");
        assert_eq!(fs::read_dir(cache.dir()).unwrap().count(), 1);

        cache.clear().unwrap();
        assert!(!cache.dir().exists());
        cache.clear().unwrap();
    }
}
