//! Library error types

use std::path::PathBuf;

use thiserror::Error;

use crate::stores::StoreError;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("a file named {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is outside the library: {}", .0.display())]
    OutsideLibrary(PathBuf),

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
