//! Error types for metadata and file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Structural input problems. Any of these aborts a conference run.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Metadata or publication file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Inventory Errors ===
    /// A file pool contains more than one file format.
    #[error("directory {path} contains files with multiple formats: {}", .extensions.join(", "))]
    MixedFormat {
        path: PathBuf,
        extensions: Vec<String>,
    },

    /// A filename is not valid UTF-8 and cannot be matched or copied.
    #[error("filename is not valid UTF-8: {}", .path.display())]
    NonUtf8Filename { path: PathBuf },

    /// A required file pool has no files.
    #[error("directory {path} contains no files")]
    EmptyDirectory { path: PathBuf },

    /// PDF and XML pools do not contain the same file stems.
    #[error(
        "pdf and xml directories do not match: no xml for [{}], no pdf for [{}]",
        .missing_xml.join(", "),
        .missing_pdf.join(", ")
    )]
    FilenameMismatch {
        missing_xml: Vec<String>,
        missing_pdf: Vec<String>,
    },

    /// The configured noise pattern is not a valid regular expression.
    #[error("invalid noise pattern '{pattern}': {source}")]
    InvalidNoisePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // === Metadata Errors ===
    /// Malformed XML.
    #[error("failed to parse XML {path} at byte {position}: {message}")]
    XmlParse {
        path: PathBuf,
        position: u64,
        message: String,
    },

    /// The metadata file has no `<metadata>` elements.
    #[error("metadata file {path} contains no <metadata> elements")]
    NoRecords { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
