//! Extraction error types
//!
//! Errors never cross the loader boundary: `ContentLoader` turns every
//! variant into `ExtractionResult::Failure` using the `Display` text below.

use thiserror::Error;

/// Unified extraction error type
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Classifier returned `Unknown`
    #[error("unknown or unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// No OPF package document could be located in the EPUB
    #[error("package document not found in EPUB")]
    PackageNotFound,

    /// Malformed container structure
    #[error("malformed container: {0}")]
    Structure(String),

    /// PDF yielded no non-blank page
    #[error("empty or unreadable PDF")]
    EmptyPdf,

    /// EPUB yielded no chapter with visible text
    #[error("no extractable text")]
    NoText,

    /// Comic archive holds no image entries
    #[error("no images found")]
    NoImages,

    /// Password-protected archive
    #[error("protected archive not supported")]
    ProtectedArchive,

    /// RAR5 container the decoder rejected
    #[error("RAR5 not supported")]
    Rar5Unsupported,

    /// MuPDF error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// RAR decoder error
    #[error("RAR error: {0}")]
    Rar(String),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Image decode/encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background worker failed to complete
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Coarse failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedFormat,
    ContainerStructure,
    EmptyContent,
    UnsupportedVariant,
    Io,
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsupportedFormat(_) => FailureKind::UnsupportedFormat,
            Self::PackageNotFound | Self::Structure(_) => FailureKind::ContainerStructure,
            Self::EmptyPdf | Self::NoText | Self::NoImages => FailureKind::EmptyContent,
            Self::ProtectedArchive | Self::Rar5Unsupported => FailureKind::UnsupportedVariant,
            Self::Pdf(_)
            | Self::Rar(_)
            | Self::Zip(_)
            | Self::Xml(_)
            | Self::Image(_)
            | Self::Io(_)
            | Self::Task(_) => FailureKind::Io,
        }
    }
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

impl From<mupdf::Error> for ExtractError {
    fn from(err: mupdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}
