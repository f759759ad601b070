//! PDF/XML pool consistency.

use tracing::warn;

use crate::error::{IngestError, Result};
use crate::inventory::FileInventory;

/// Verifies that both pools hold exactly the same file stems.
///
/// Runs before any matching: a publication whose PDF has no XML partner (or
/// the reverse) cannot be bundled.
pub fn check_pairing(pdf: &FileInventory, xml: &FileInventory) -> Result<()> {
    let pdf_stems = pdf.stems();
    let xml_stems = xml.stems();
    if pdf_stems == xml_stems {
        return Ok(());
    }

    let missing_xml: Vec<String> = pdf_stems.difference(&xml_stems).cloned().collect();
    let missing_pdf: Vec<String> = xml_stems.difference(&pdf_stems).cloned().collect();
    warn!(
        missing_xml = missing_xml.len(),
        missing_pdf = missing_pdf.len(),
        "pdf and xml directories do not match"
    );
    Err(IngestError::FilenameMismatch {
        missing_xml,
        missing_pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryOptions;
    use tempfile::TempDir;

    fn pool(names: &[&str]) -> (TempDir, FileInventory) {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let inventory = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap();
        (dir, inventory)
    }

    #[test]
    fn test_matching_stems_pass() {
        let (_p, pdf) = pool(&["001_final-A.pdf", "002_final-B.pdf"]);
        let (_x, xml) = pool(&["001_final-A.xml", "002_final-B.xml"]);
        assert!(check_pairing(&pdf, &xml).is_ok());
    }

    #[test]
    fn test_mismatch_lists_both_sides() {
        let (_p, pdf) = pool(&["A.pdf", "B.pdf"]);
        let (_x, xml) = pool(&["A.xml", "C.xml"]);
        match check_pairing(&pdf, &xml).unwrap_err() {
            IngestError::FilenameMismatch {
                missing_xml,
                missing_pdf,
            } => {
                assert_eq!(missing_xml, vec!["B".to_string()]);
                assert_eq!(missing_pdf, vec!["C".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
