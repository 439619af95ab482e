//! Format-specific extractors

pub mod archive;
pub mod cbr;
pub mod cbz;
pub mod epub;
pub mod pdf;

pub use archive::{ArchiveEntry, PageArchive};
