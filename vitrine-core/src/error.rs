use thiserror::Error;

use crate::artwork::scanner::ScannerError;

#[derive(Error, Debug)]
pub enum ArtworkError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Scanner '{scanner}' failed: {source}")]
    Scanner {
        scanner: String,
        #[source]
        source: ScannerError,
    },

    #[error("Artwork locator failed: {0}")]
    Locator(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ArtworkError>;
