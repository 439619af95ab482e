//! ZIP-based comic archives (CBZ)

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::archive::{self, ArchiveEntry, EntryVisitor, PageArchive};
use crate::content::{PageCache, Result};

/// `PageArchive` over a `zip::ZipArchive`
pub struct ZipPageArchive<R> {
    inner: ZipArchive<R>,
}

impl ZipPageArchive<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> ZipPageArchive<R> {
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            inner: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> PageArchive for ZipPageArchive<R> {
    fn is_protected(&mut self) -> Result<bool> {
        for i in 0..self.inner.len() {
            if self.inner.by_index_raw(i)?.encrypted() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(self.inner.len());
        for i in 0..self.inner.len() {
            let file = self.inner.by_index_raw(i)?;
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
            });
        }
        Ok(entries)
    }

    fn visit_entries(
        &mut self,
        wanted: &HashSet<String>,
        visit: &mut EntryVisitor<'_>,
    ) -> Result<()> {
        for name in wanted {
            let mut file = match self.inner.by_name(name) {
                Ok(file) => file,
                Err(zip::result::ZipError::FileNotFound) => continue,
                Err(e) => return Err(e.into()),
            };
            visit(name, &mut file)?;
        }
        Ok(())
    }
}

/// Extract the pages of a CBZ file into its page cache
pub fn extract(path: &Path, cache: &PageCache) -> Result<Vec<PathBuf>> {
    archive::extract_pages(|| ZipPageArchive::open(path), cache)
}

/// Raw bytes of the alphabetically first image, if any
pub fn first_image(path: &Path) -> Result<Option<Vec<u8>>> {
    let mut archive = ZipPageArchive::open(path)?;
    archive::first_image(&mut archive)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Write a ZIP archive with the given entries; names ending in `/` become directories
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, bytes) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(bytes).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_cbz_orders_and_names_pages() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Issue 1.cbz");
        let three: &[u8] = b"three";
        let one: &[u8] = b"one";
        let two: &[u8] = b"two";
        write_zip(
            &source,
            &[("003.png", three), ("001.jpg", one), ("002.jpg", two)],
        );

        let cache = PageCache::for_source(&temp_dir.path().join("cache"), "Issue 1.cbz");
        let pages = extract(&source, &cache).unwrap();

        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["0000.jpg", "0001.jpg", "0002.png"]);
        assert_eq!(std::fs::read(&pages[0]).unwrap(), b"one");
        assert_eq!(std::fs::read(&pages[2]).unwrap(), b"three");
    }

    #[test]
    fn test_directories_and_other_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("nested.cbz");
        let empty: &[u8] = b"";
        let xml: &[u8] = b"<ComicInfo/>";
        let page: &[u8] = b"page";
        write_zip(
            &source,
            &[
                ("chapter1/", empty),
                ("ComicInfo.xml", xml),
                ("chapter1/01.JPG", page),
            ],
        );

        let cache = PageCache::for_source(temp_dir.path(), "nested.cbz");
        let pages = extract(&source, &cache).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ends_with("0000.jpg"));
    }

    #[test]
    fn test_second_extract_hits_cache() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("again.cbz");
        let page: &[u8] = b"page";
        write_zip(&source, &[("a.jpg", page)]);

        let cache = PageCache::for_source(temp_dir.path(), "again.cbz");
        let first = extract(&source, &cache).unwrap();

        // The archive is gone, so only the cache can answer
        std::fs::remove_file(&source).unwrap();
        let second = extract(&source, &cache).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_image_from_zip() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("cover.cbz");
        let back: &[u8] = b"back";
        let front: &[u8] = b"front";
        write_zip(&source, &[("b.jpg", back), ("a.jpg", front)]);

        assert_eq!(first_image(&source).unwrap(), Some(b"front".to_vec()));
    }
}
