//! RAR-based comic archives (CBR)
//!
//! Decoding goes through the `unrar` crate. RAR5 archives and password
//! protected archives are reported as distinct unsupported variants.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use unrar::error::{Code, UnrarError};
use unrar::Archive;

use super::archive::{self, ArchiveEntry, EntryVisitor, PageArchive};
use crate::content::{ExtractError, PageCache, Result};

/// `PageArchive` over a RAR file on disk
///
/// The decoder is cursor based, so each operation reopens the file.
pub struct RarPageArchive {
    path: PathBuf,
}

impl RarPageArchive {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ExtractError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl PageArchive for RarPageArchive {
    fn is_protected(&mut self) -> Result<bool> {
        let listing = match Archive::new(&self.path).open_for_listing() {
            Ok(listing) => listing,
            Err(e) if e.code == Code::MissingPassword => return Ok(true),
            Err(e) => return Err(map_rar_error(e)),
        };
        if listing.has_encrypted_headers() {
            return Ok(true);
        }
        for header in listing {
            match header {
                Ok(header) if header.is_encrypted() => return Ok(true),
                Ok(_) => {}
                Err(e) if e.code == Code::MissingPassword => return Ok(true),
                Err(e) => return Err(map_rar_error(e)),
            }
        }
        Ok(false)
    }

    fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let listing = Archive::new(&self.path)
            .open_for_listing()
            .map_err(map_rar_error)?;

        let mut entries = Vec::new();
        for header in listing {
            let header = header.map_err(map_rar_error)?;
            entries.push(ArchiveEntry {
                name: entry_name(&header.filename),
                is_dir: header.is_directory(),
            });
        }
        Ok(entries)
    }

    fn visit_entries(
        &mut self,
        wanted: &HashSet<String>,
        visit: &mut EntryVisitor<'_>,
    ) -> Result<()> {
        let mut archive = Archive::new(&self.path)
            .open_for_processing()
            .map_err(map_rar_error)?;

        let mut remaining = wanted.len();
        while remaining > 0 {
            let Some(header) = archive.read_header().map_err(map_rar_error)? else {
                break;
            };
            let name = entry_name(&header.entry().filename);
            archive = if header.entry().is_file() && wanted.contains(&name) {
                let (data, rest) = header.read().map_err(map_rar_error)?;
                visit(&name, &mut data.as_slice())?;
                remaining -= 1;
                rest
            } else {
                header.skip().map_err(map_rar_error)?
            };
        }
        Ok(())
    }
}

/// Archive-relative name with forward slashes
fn entry_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn map_rar_error(err: UnrarError) -> ExtractError {
    if err.code == Code::MissingPassword {
        return ExtractError::ProtectedArchive;
    }
    classify_rar_error(&err.to_string())
}

/// Map a decoder diagnostic to an extraction error
///
/// Diagnostics mentioning RAR5 or a bad header mean the container format is
/// not supported. The bundled `unrar` decoder reads RAR5 itself and its own
/// messages ("Archive header damaged", "Not a RAR archive") match neither, so
/// with it every error lands in `ExtractError::Rar`.
pub fn classify_rar_error(message: &str) -> ExtractError {
    let lower = message.to_lowercase();
    if lower.contains("rar5") || lower.contains("bad header") {
        ExtractError::Rar5Unsupported
    } else {
        ExtractError::Rar(message.to_string())
    }
}

/// Extract the pages of a CBR file into its page cache
pub fn extract(path: &Path, cache: &PageCache) -> Result<Vec<PathBuf>> {
    archive::extract_pages(|| RarPageArchive::open(path), cache)
}

/// Raw bytes of the alphabetically first image, if any
pub fn first_image(path: &Path) -> Result<Option<Vec<u8>>> {
    let mut archive = RarPageArchive::open(path)?;
    if archive.is_protected()? {
        return Err(ExtractError::ProtectedArchive);
    }
    archive::first_image(&mut archive)
}
