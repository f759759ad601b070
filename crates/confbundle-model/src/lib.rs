//! Data model shared by the conference bundle crates.

#![deny(unsafe_code)]

pub mod assignment;
pub mod defect;
pub mod record;
pub mod xml;

pub use assignment::{Assignment, MatchTier};
pub use defect::{Defect, DefectKind, DefectLog};
pub use record::PublicationRecord;
pub use xml::{XmlNode, collapse_whitespace};
