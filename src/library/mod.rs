//! On-disk library
//!
//! Files are filed under `<root>/Books`, `<root>/Comics` and `<root>/Mangas`.
//! Covers sit in a `Covers/` directory inside each shelf.

mod category;
mod error;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::content::{cache_key, classify, ContentType, SourceFile};
use crate::covers::CoverExtractor;
use crate::stores::{migrate_book, FavoritesStore, ProgressStore};

pub use category::Category;
pub use error::{LibraryError, Result};

/// One scanned library entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    /// Stable identifier derived from the absolute path
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
    pub cover_path: Option<PathBuf>,
    pub category: Category,
    pub content_type: ContentType,
    pub favorite: bool,
    /// Saved reading position
    pub progress: usize,
}

/// Filters applied by [`LibraryLayout::scan`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    /// Only this shelf; every shelf when unset
    pub category: Option<Category>,
    pub favorites_only: bool,
    /// Case-insensitive title filter
    pub query: Option<String>,
}

/// Library directory structure rooted at one directory
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    root: PathBuf,
}

impl LibraryLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Create the root and every shelf directory
    pub fn initialize(&self) -> Result<()> {
        for category in Category::ALL {
            fs::create_dir_all(self.category_dir(category))?;
        }
        tracing::info!("Library initialized at {}", self.root.display());
        Ok(())
    }

    /// Copy the file at `source` into a shelf
    ///
    /// `file_name` overrides the stored name; otherwise the source's own name
    /// is kept.
    pub fn import_file(
        &self,
        source: &Path,
        file_name: Option<&str>,
        category: Category,
    ) -> Result<PathBuf> {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| LibraryError::InvalidName(source.display().to_string()))?,
        };
        let mut file = fs::File::open(source).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound(source.to_path_buf()),
            _ => LibraryError::Io(e),
        })?;
        self.import_reader(&mut file, &name, category)
    }

    /// Store the bytes from `reader` as `file_name` on a shelf
    pub fn import_reader(
        &self,
        reader: &mut dyn Read,
        file_name: &str,
        category: Category,
    ) -> Result<PathBuf> {
        let name = sanitize_file_name(file_name)?;
        let content_type = classify(&name);
        if content_type == ContentType::Unknown {
            return Err(LibraryError::Unsupported(name));
        }

        let dir = self.category_dir(category);
        fs::create_dir_all(&dir)?;
        let target = dir.join(&name);
        if target.exists() {
            return Err(LibraryError::AlreadyExists(target));
        }

        let mut partial = target.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);
        let copied = {
            let mut out = fs::File::create(&partial)?;
            io::copy(reader, &mut out)
        };
        match copied {
            Ok(bytes) => {
                fs::rename(&partial, &target)?;
                tracing::info!("Imported {} ({} bytes) into {}", name, bytes, category);
                Ok(target)
            }
            Err(e) => {
                let _ = fs::remove_file(&partial);
                Err(e.into())
            }
        }
    }

    /// List visible, supported files, extracting missing covers on the way
    pub fn scan<S>(
        &self,
        options: &ScanOptions,
        store: &S,
        covers: &CoverExtractor,
    ) -> Result<Vec<LibraryItem>>
    where
        S: FavoritesStore + ProgressStore + ?Sized,
    {
        let categories: Vec<Category> = match options.category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };
        let query = options
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut items = Vec::new();
        for category in categories {
            let dir = self.category_dir(category);
            fs::create_dir_all(&dir)?;

            let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
                .map(|entry| entry.path())
                .filter(|path| is_listed(path))
                .collect();
            files.sort();

            for path in files {
                let source = SourceFile::new(path.canonicalize().unwrap_or(path));
                let title = source.stem();
                if let Some(query) = &query {
                    if !title.to_lowercase().contains(query) {
                        continue;
                    }
                }

                let key = path_key(source.path());
                let favorite = store.is_favorite(&key)?;
                if options.favorites_only && !favorite {
                    continue;
                }

                covers.extract_and_save(&source);
                let cover = CoverExtractor::cover_path(source.path());

                items.push(LibraryItem {
                    id: cache_key(&key),
                    title,
                    file_name: source.file_name(),
                    path: source.path().to_path_buf(),
                    cover_path: cover.is_file().then_some(cover),
                    category,
                    content_type: source.content_type(),
                    favorite,
                    progress: store.get_progress(&key)?,
                });
            }
        }

        tracing::debug!("Scanned {} library items", items.len());
        Ok(items)
    }

    /// Rename a file in place, keeping its extension
    ///
    /// The cover follows the file, and favorite and progress state move to
    /// the new path.
    pub fn rename<S>(&self, path: &Path, new_stem: &str, store: &S) -> Result<PathBuf>
    where
        S: FavoritesStore + ProgressStore + ?Sized,
    {
        let new_stem = new_stem.trim();
        if new_stem.is_empty() || new_stem.contains(['/', '\\']) || new_stem == ".." {
            return Err(LibraryError::InvalidName(new_stem.to_string()));
        }

        let current = self.resolve(path)?;
        let file_name = match current.extension() {
            Some(ext) => format!("{}.{}", new_stem, ext.to_string_lossy()),
            None => new_stem.to_string(),
        };
        let target = current.with_file_name(&file_name);
        if target.exists() {
            return Err(LibraryError::AlreadyExists(target));
        }

        fs::rename(&current, &target)?;

        let old_cover = CoverExtractor::cover_path(&current);
        if old_cover.is_file() {
            if let Err(e) = fs::rename(&old_cover, CoverExtractor::cover_path(&target)) {
                tracing::warn!("Could not move cover {}: {}", old_cover.display(), e);
            }
        }

        migrate_book(store, &path_key(&current), &path_key(&target))?;
        tracing::info!("Renamed {} to {}", current.display(), target.display());
        Ok(target)
    }

    /// Delete a file and its cover
    pub fn delete(&self, path: &Path) -> Result<()> {
        let current = self.resolve(path)?;
        fs::remove_file(&current)?;

        let cover = CoverExtractor::cover_path(&current);
        match fs::remove_file(&cover) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                tracing::warn!("Could not delete cover {}: {}", cover.display(), e);
            }
            _ => {}
        }
        tracing::info!("Deleted {}", current.display());
        Ok(())
    }

    /// Canonical path of an existing file inside the library root
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path.canonicalize().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound(path.to_path_buf()),
            _ => LibraryError::Io(e),
        })?;
        let root = self.root.canonicalize()?;
        if !canonical.starts_with(&root) || !canonical.is_file() {
            return Err(LibraryError::OutsideLibrary(path.to_path_buf()));
        }
        Ok(canonical)
    }
}

/// Key used for favorites and progress: the absolute path as text
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn is_listed(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    !name.starts_with('.') && classify(&name) != ContentType::Unknown
}

fn sanitize_file_name(file_name: &str) -> Result<String> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." || name.starts_with('.') {
        return Err(LibraryError::InvalidName(file_name.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cbz::tests::write_zip;
    use crate::stores::MemoryStore;
    use tempfile::TempDir;

    fn library() -> (TempDir, LibraryLayout) {
        let temp_dir = TempDir::new().unwrap();
        let layout = LibraryLayout::new(temp_dir.path().canonicalize().unwrap().join("Library"));
        layout.initialize().unwrap();
        (temp_dir, layout)
    }

    fn touch(path: &Path) {
        fs::write(path, b"%PDF-1.4").unwrap();
    }

    #[test]
    fn test_initialize_creates_shelves() {
        let (_temp_dir, layout) = library();
        for dir in ["Books", "Comics", "Mangas"] {
            assert!(layout.root().join(dir).is_dir());
        }
    }

    #[test]
    fn test_import_reader_files_by_category() {
        let (_temp_dir, layout) = library();
        let path = layout
            .import_reader(&mut &b"data"[..], "../../etc/Volume 1.cbz", Category::Manga)
            .unwrap();
        assert_eq!(path, layout.category_dir(Category::Manga).join("Volume 1.cbz"));

        let again = layout.import_reader(&mut &b"data"[..], "Volume 1.cbz", Category::Manga);
        assert!(matches!(again, Err(LibraryError::AlreadyExists(_))));

        let unsupported = layout.import_reader(&mut &b"x"[..], "notes.txt", Category::Book);
        assert!(matches!(unsupported, Err(LibraryError::Unsupported(_))));
    }

    #[test]
    fn test_import_file_copies() {
        let (temp_dir, layout) = library();
        let outside = temp_dir.path().join("novel.pdf");
        touch(&outside);

        let stored = layout.import_file(&outside, None, Category::Book).unwrap();
        assert!(outside.exists());
        assert_eq!(fs::read(stored).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_scan_skips_hidden_and_unsupported() {
        let (_temp_dir, layout) = library();
        let comics = layout.category_dir(Category::Comic);
        let page: &[u8] = b"not really an image";
        write_zip(&comics.join("B Side.cbz"), &[("001.jpg", page)]);
        write_zip(&comics.join("A Side.cbz"), &[("001.jpg", page)]);
        touch(&comics.join(".hidden.pdf"));
        fs::write(comics.join("notes.txt"), "x").unwrap();
        fs::create_dir_all(comics.join("folder.cbz")).unwrap();

        let store = MemoryStore::new();
        let covers = CoverExtractor::default();
        let items = layout.scan(&ScanOptions::default(), &store, &covers).unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A Side", "B Side"]);
        assert!(items.iter().all(|i| i.category == Category::Comic));
        // Undecodable page images yield no cover
        assert!(items.iter().all(|i| i.cover_path.is_none()));
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn test_scan_filters() {
        let (_temp_dir, layout) = library();
        let books = layout.category_dir(Category::Book);
        touch(&books.join("Dune.pdf"));
        touch(&books.join("Emma.pdf"));

        let store = MemoryStore::new();
        let covers = CoverExtractor::default();
        let dune = path_key(&books.join("Dune.pdf"));
        store.set_favorite(&dune, true).unwrap();
        store.save_progress(&dune, 3).unwrap();

        let favorites = layout
            .scan(
                &ScanOptions {
                    favorites_only: true,
                    ..Default::default()
                },
                &store,
                &covers,
            )
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].progress, 3);

        let searched = layout
            .scan(
                &ScanOptions {
                    category: Some(Category::Book),
                    query: Some("EMM".into()),
                    ..Default::default()
                },
                &store,
                &covers,
            )
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].title, "Emma");
    }

    #[test]
    fn test_rename_moves_cover_and_state() {
        let (_temp_dir, layout) = library();
        let books = layout.category_dir(Category::Book);
        let original = books.join("Old.pdf");
        touch(&original);
        let old_cover = CoverExtractor::cover_path(&original);
        fs::create_dir_all(old_cover.parent().unwrap()).unwrap();
        fs::write(&old_cover, b"jpeg").unwrap();

        let store = MemoryStore::new();
        store.set_favorite(&path_key(&original), true).unwrap();
        store.save_progress(&path_key(&original), 9).unwrap();

        let renamed = layout.rename(&original, "  New ", &store).unwrap();
        assert_eq!(renamed, books.join("New.pdf"));
        assert!(!original.exists());
        assert!(CoverExtractor::has_cover(&renamed));
        assert!(!old_cover.exists());
        assert!(store.is_favorite(&path_key(&renamed)).unwrap());
        assert_eq!(store.get_progress(&path_key(&renamed)).unwrap(), 9);
        assert_eq!(store.get_progress(&path_key(&original)).unwrap(), 0);
    }

    #[test]
    fn test_rename_rejections() {
        let (_temp_dir, layout) = library();
        let books = layout.category_dir(Category::Book);
        touch(&books.join("One.pdf"));
        touch(&books.join("Two.pdf"));
        let store = MemoryStore::new();

        assert!(matches!(
            layout.rename(&books.join("One.pdf"), "   ", &store),
            Err(LibraryError::InvalidName(_))
        ));
        assert!(matches!(
            layout.rename(&books.join("One.pdf"), "Two", &store),
            Err(LibraryError::AlreadyExists(_))
        ));
        assert!(matches!(
            layout.rename(&books.join("Missing.pdf"), "Three", &store),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_file_and_cover() {
        let (temp_dir, layout) = library();
        let comics = layout.category_dir(Category::Comic);
        let file = comics.join("Gone.cbz");
        touch(&file);
        let cover = CoverExtractor::cover_path(&file);
        fs::create_dir_all(cover.parent().unwrap()).unwrap();
        fs::write(&cover, b"jpeg").unwrap();

        layout.delete(&file).unwrap();
        assert!(!file.exists());
        assert!(!cover.exists());

        let outside = temp_dir.path().join("outside.pdf");
        touch(&outside);
        assert!(matches!(
            layout.delete(&outside),
            Err(LibraryError::OutsideLibrary(_))
        ));
        assert!(outside.exists());
    }
}
