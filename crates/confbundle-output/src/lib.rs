//! Output side of a conference run.
//!
//! Writes one bundle directory per publication (manifest plus publication
//! files), checks the result and produces the CSV audit report.

#![deny(unsafe_code)]

pub mod assembler;
pub mod audit;
pub mod error;
pub mod layout;
pub mod manifest;

pub use assembler::{
    AssemblyOutcome, Bundle, BundleAssembler, BundleOptions, PUBLICATIONS_DIR, check_completeness,
    duplicate_assignments,
};
pub use audit::{AuditRow, write_audit_csv};
pub use error::{OutputError, Result};
pub use layout::{BundleContents, read_bundle};
pub use manifest::{
    Community, Contributor, Creator, MANIFEST_FILE, Manifest, ManifestMetadata, RelatedIdentifier,
    split_keywords,
};
