//! Shared page extraction for comic archives
//!
//! ZIP and RAR archives expose the same small surface through
//! [`PageArchive`]; ordering, filtering and cache bookkeeping live here once.

use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

use crate::content::{image_extension, is_image_name, ExtractError, PageCache, Result};

/// One entry in an archive listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ArchiveEntry {
    pub fn is_page(&self) -> bool {
        !self.is_dir && is_image_name(&self.name)
    }
}

/// Callback receiving the contents of one requested entry
pub type EntryVisitor<'a> = dyn FnMut(&str, &mut dyn Read) -> Result<()> + 'a;

/// Abstraction over comic archive containers
pub trait PageArchive {
    /// Whether the archive needs a password
    fn is_protected(&mut self) -> Result<bool>;

    /// All entries in archive order
    fn entries(&mut self) -> Result<Vec<ArchiveEntry>>;

    /// Stream each entry named in `wanted` to `visit`
    ///
    /// Entries are visited in archive order, which need not match the order
    /// of `wanted`. Names not present in the archive are ignored.
    fn visit_entries(&mut self, wanted: &HashSet<String>, visit: &mut EntryVisitor<'_>)
        -> Result<()>;
}

/// Image entries sorted by name, which is the page ordering contract
///
/// A name listed more than once becomes a single page.
pub fn page_entries<A: PageArchive + ?Sized>(archive: &mut A) -> Result<Vec<String>> {
    let mut names: Vec<String> = archive
        .entries()?
        .into_iter()
        .filter(ArchiveEntry::is_page)
        .map(|entry| entry.name)
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

/// Extract every page of an archive into `cache`
///
/// The cache short-circuit runs before `open` is called, so a populated cache
/// never touches the archive. Pages already on disk are not rewritten.
pub fn extract_pages<A, F>(open: F, cache: &PageCache) -> Result<Vec<PathBuf>>
where
    A: PageArchive,
    F: FnOnce() -> Result<A>,
{
    let cached = cache.cached_pages();
    if !cached.is_empty() {
        tracing::debug!("Page cache hit: {} pages in {}", cached.len(), cache.dir().display());
        return Ok(cached);
    }

    let mut archive = open()?;
    if archive.is_protected()? {
        return Err(ExtractError::ProtectedArchive);
    }

    let names = page_entries(&mut archive)?;
    if names.is_empty() {
        return Err(ExtractError::NoImages);
    }

    cache.ensure_dir()?;

    let mut pages = Vec::with_capacity(names.len());
    let mut missing: Vec<(String, PathBuf)> = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let ext = image_extension(name).unwrap_or_else(|| "img".to_string());
        let path = cache.page_path(index, &ext);
        if !path.exists() {
            missing.push((name.clone(), path.clone()));
        }
        pages.push(path);
    }

    if !missing.is_empty() {
        tracing::debug!(
            "Extracting {} of {} pages into {}",
            missing.len(),
            pages.len(),
            cache.dir().display()
        );
        let wanted: HashSet<String> = missing.iter().map(|(name, _)| name.clone()).collect();
        let mut written: HashSet<String> = HashSet::new();
        archive.visit_entries(&wanted, &mut |name, reader| {
            if !written.insert(name.to_string()) {
                return Ok(());
            }
            for (_, path) in missing.iter().filter(|(n, _)| n == name) {
                cache.write_page(path, reader)?;
            }
            Ok(())
        })?;
    }

    Ok(pages)
}

/// Bytes of the alphabetically first image entry, if any
pub fn first_image<A: PageArchive + ?Sized>(archive: &mut A) -> Result<Option<Vec<u8>>> {
    let Some(first) = page_entries(archive)?.into_iter().next() else {
        return Ok(None);
    };

    let wanted = HashSet::from([first]);
    let mut bytes = None;
    archive.visit_entries(&wanted, &mut |_, reader| {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        bytes = Some(buf);
        Ok(())
    })?;
    Ok(bytes)
}
