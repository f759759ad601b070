//! Error types for file assignment.

use std::path::PathBuf;
use thiserror::Error;

/// Structural problems that prevent any assignment.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The PDF pool has no usable comparison keys.
    #[error("no publication files to match in {path}")]
    EmptyInventory { path: PathBuf },

    /// Candidate sets were not built for every record.
    #[error("{records} records but {candidate_sets} candidate sets")]
    CandidateCountMismatch {
        records: usize,
        candidate_sets: usize,
    },

    /// A sequenced conference needs exactly one file per record.
    #[error("sequenced assignment needs one file per record: {records} records, {files} files in {path}")]
    SequenceLengthMismatch {
        path: PathBuf,
        records: usize,
        files: usize,
    },
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;
