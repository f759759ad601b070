//! Input side of a conference run.
//!
//! Loads the conference metadata file, lists the PDF and XML publication
//! pools and checks that they are consistent before any matching happens.

#![deny(unsafe_code)]

pub mod error;
pub mod inventory;
pub mod metadata;
pub mod pairing;
pub mod tei;
pub mod xml;

pub use error::{IngestError, Result};
pub use inventory::{
    DEFAULT_IGNORED_FILES, DEFAULT_NOISE_PATTERN, FileInventory, InventoryEntry,
    InventoryOptions, file_extension, file_stem,
};
pub use metadata::{RECORD_ELEMENT, load_metadata, parse_metadata};
pub use pairing::check_pairing;
pub use tei::{parse_xml_title, xml_title};
pub use xml::{parse_document, read_document};
