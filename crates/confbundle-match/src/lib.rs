//! Filename heuristics that attach publication files to metadata records.
//!
//! Titles and creator names are sanitized into candidate keys
//! ([`candidates`]), which the [`MatchEngine`] tests against the comparison
//! keys of a [`confbundle_ingest::FileInventory`].

#![deny(unsafe_code)]

pub mod candidates;
pub mod engine;
pub mod error;
pub mod sanitize;

pub use candidates::{CandidateSet, CreatorName, candidates};
pub use engine::{MatchEngine, duplicate_files};
pub use error::{MatchError, Result};
pub use sanitize::{EMPHASIS_MARKER, sanitize, sanitize_opt};
