//! Error types for sitemap-gen
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using the sitemap-gen [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sitemap generation operations
#[derive(Error, Debug)]
pub enum Error {
    /// XML serialization error (the document cannot be encoded)
    #[error("serialization error: {0}")]
    Serialization(#[from] quick_xml::Error),

    /// I/O error (directory creation or file write failed)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search-engine notification error; advisory only, the files already
    /// written remain valid
    #[error("notification error: {0}")]
    Notification(String),

    /// Ping endpoint URL error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A single URL entry is larger than the maximum file size, so no amount
    /// of splitting can produce a conforming file
    #[error("entry of {size} bytes exceeds the maximum file size of {limit} bytes")]
    EntryTooLarge {
        /// Serialized document size with only this entry present
        size: u64,
        /// Configured maximum file size
        limit: u64,
    },
}
