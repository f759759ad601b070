//! Audit report listing which files ended up in which bundle.

use std::path::Path;

use tracing::info;

use confbundle_model::Assignment;

use crate::assembler::AssemblyOutcome;
use crate::error::{OutputError, Result};

/// One report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub bundle: String,
    pub title: String,
    pub xml_title: String,
    pub pdf: String,
    pub xml: String,
    pub match_tier: String,
    pub warnings: String,
}

impl AuditRow {
    pub fn new(outcome: &AssemblyOutcome, assignment: &Assignment) -> Self {
        let mut warnings = assignment.warnings.clone();
        warnings.extend(outcome.defects().iter().map(ToString::to_string));
        Self {
            bundle: outcome.bundle_name().to_string(),
            title: assignment.record_title.clone(),
            xml_title: outcome
                .bundle()
                .and_then(|bundle| bundle.xml_title.clone())
                .unwrap_or_default(),
            pdf: assignment.matched_pdf.clone().unwrap_or_default(),
            xml: assignment.matched_xml.clone().unwrap_or_default(),
            match_tier: assignment.match_tier.to_string(),
            warnings: warnings.join("; "),
        }
    }
}

const PDF_HEADER: [&str; 5] = ["Bundle", "Title", "PDF", "Match", "Warnings"];
const PAIRED_HEADER: [&str; 7] = [
    "Bundle",
    "Title",
    "Title from xml",
    "PDF",
    "XML",
    "Match",
    "Warnings",
];

/// Writes the audit CSV, creating its parent directory.
///
/// `with_xml` selects the PDF+XML column set.
pub fn write_audit_csv(path: &Path, rows: &[AuditRow], with_xml: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }
    let csv_error = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    if with_xml {
        writer.write_record(PAIRED_HEADER).map_err(csv_error)?;
    } else {
        writer.write_record(PDF_HEADER).map_err(csv_error)?;
    }
    for row in rows {
        if with_xml {
            writer
                .write_record([
                    &row.bundle,
                    &row.title,
                    &row.xml_title,
                    &row.pdf,
                    &row.xml,
                    &row.match_tier,
                    &row.warnings,
                ])
                .map_err(csv_error)?;
        } else {
            writer
                .write_record([&row.bundle, &row.title, &row.pdf, &row.match_tier, &row.warnings])
                .map_err(csv_error)?;
        }
    }
    writer.flush().map_err(|e| OutputError::io(path, e))?;
    info!(path = %path.display(), rows = rows.len(), "wrote audit report");
    Ok(())
}
