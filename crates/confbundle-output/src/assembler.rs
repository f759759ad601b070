//! Bundle directories.
//!
//! A bundle is one directory per publication holding the manifest and a
//! `bundle_publications` folder with the publication files.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use confbundle_ingest::{file_stem, xml_title};
use confbundle_match::{duplicate_files, sanitize};
use confbundle_model::{Assignment, Defect, DefectKind, PublicationRecord};

use crate::error::{OutputError, Result};
use crate::manifest::{MANIFEST_FILE, Manifest};

/// Folder inside each bundle that holds the publication files.
pub const PUBLICATIONS_DIR: &str = "bundle_publications";

/// Where bundles are written and where their files come from.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Conference output directory; one bundle directory per record is created inside.
    pub output_root: PathBuf,
    pub pdf_dir: PathBuf,
    /// Set in PDF+XML mode.
    pub xml_dir: Option<PathBuf>,
    /// Plan bundles without touching the filesystem.
    pub dry_run: bool,
}

impl BundleOptions {
    /// Files expected in every `bundle_publications` folder.
    pub fn expected_files(&self) -> usize {
        if self.xml_dir.is_some() { 2 } else { 1 }
    }
}

/// A bundle as written (or planned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub name: String,
    pub directory: PathBuf,
    pub manifest_path: PathBuf,
    pub publication_files: Vec<PathBuf>,
    /// Title from the metadata record.
    pub title: String,
    /// Title read from the paired TEI file.
    pub xml_title: Option<String>,
}

/// Result of assembling one record.
#[derive(Debug, Clone)]
pub enum AssemblyOutcome {
    Created { bundle: Bundle, defects: Vec<Defect> },
    /// Dry run: nothing was written.
    Planned { bundle: Bundle, defects: Vec<Defect> },
    /// The bundle directory already existed and was left untouched.
    Skipped { bundle_name: String, defect: Defect },
}

impl AssemblyOutcome {
    pub fn bundle_name(&self) -> &str {
        match self {
            Self::Created { bundle, .. } | Self::Planned { bundle, .. } => &bundle.name,
            Self::Skipped { bundle_name, .. } => bundle_name,
        }
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        match self {
            Self::Created { bundle, .. } | Self::Planned { bundle, .. } => Some(bundle),
            Self::Skipped { .. } => None,
        }
    }

    pub fn defects(&self) -> &[Defect] {
        match self {
            Self::Created { defects, .. } | Self::Planned { defects, .. } => defects,
            Self::Skipped { defect, .. } => std::slice::from_ref(defect),
        }
    }
}

/// Writes bundle directories for assigned records.
#[derive(Debug, Clone)]
pub struct BundleAssembler {
    options: BundleOptions,
}

impl BundleAssembler {
    pub fn new(options: BundleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Bundle directory name for an assignment.
    ///
    /// PDF+XML bundles are named after the sanitized PDF stem; all others are
    /// numbered `bundle_001`, `bundle_002`, ... by 1-based record ordinal.
    pub fn bundle_name(&self, assignment: &Assignment, ordinal: usize) -> String {
        match (&self.options.xml_dir, assignment.pdf_stem()) {
            (Some(_), Some(stem)) => sanitize(stem),
            _ => format!("bundle_{ordinal:03}"),
        }
    }

    /// Creates the bundle of one record.
    pub fn assemble(
        &self,
        record: &PublicationRecord,
        assignment: &Assignment,
        ordinal: usize,
    ) -> Result<AssemblyOutcome> {
        let name = self.bundle_name(assignment, ordinal);
        let directory = self.options.output_root.join(&name);

        if directory.exists() {
            warn!(bundle = %name, "bundle directory already exists, skipping");
            return Ok(AssemblyOutcome::Skipped {
                defect: Defect::new(
                    DefectKind::BundleExists,
                    &name,
                    format!("{} already exists", directory.display()),
                ),
                bundle_name: name,
            });
        }

        let (manifest, mut defects) = Manifest::from_record(record);
        let publications = directory.join(PUBLICATIONS_DIR);
        let sources = self.sources(assignment);
        let xml_title = self.read_xml_title(assignment, &name, &mut defects);

        let bundle = Bundle {
            manifest_path: directory.join(MANIFEST_FILE),
            publication_files: sources
                .iter()
                .filter_map(|source| source.file_name().map(|f| publications.join(f)))
                .collect(),
            name,
            directory,
            title: record.display_title(),
            xml_title,
        };

        if self.options.dry_run {
            debug!(bundle = %bundle.name, "planned bundle");
            return Ok(AssemblyOutcome::Planned { bundle, defects });
        }

        if let Err(error) = write_bundle(&bundle, &sources, &manifest) {
            // A partial directory would be skipped as existing on the next run.
            if let Err(cleanup) = std::fs::remove_dir_all(&bundle.directory)
                && bundle.directory.exists()
            {
                warn!(
                    bundle = %bundle.name,
                    error = %cleanup,
                    "could not remove partial bundle"
                );
            }
            return Err(error);
        }
        info!(
            bundle = %bundle.name,
            files = bundle.publication_files.len(),
            "created bundle"
        );
        Ok(AssemblyOutcome::Created { bundle, defects })
    }

    fn sources(&self, assignment: &Assignment) -> Vec<PathBuf> {
        let mut sources = Vec::new();
        if let Some(pdf) = &assignment.matched_pdf {
            sources.push(self.options.pdf_dir.join(pdf));
        }
        if let (Some(dir), Some(xml)) = (&self.options.xml_dir, &assignment.matched_xml) {
            sources.push(dir.join(xml));
        }
        sources
    }

    fn read_xml_title(
        &self,
        assignment: &Assignment,
        bundle_name: &str,
        defects: &mut Vec<Defect>,
    ) -> Option<String> {
        let dir = self.options.xml_dir.as_ref()?;
        let xml = assignment.matched_xml.as_ref()?;
        match xml_title(&dir.join(xml)) {
            Ok(Some(title)) => Some(title),
            Ok(None) => {
                warn!(file = %xml, "no title in xml file");
                defects.push(Defect::new(
                    DefectKind::UnreadableXmlTitle,
                    bundle_name,
                    format!("{xml} has no usable <title>"),
                ));
                None
            }
            Err(error) => {
                warn!(file = %xml, error = %error, "could not read xml title");
                defects.push(Defect::new(
                    DefectKind::UnreadableXmlTitle,
                    bundle_name,
                    error.to_string(),
                ));
                None
            }
        }
    }
}

fn write_bundle(bundle: &Bundle, sources: &[PathBuf], manifest: &Manifest) -> Result<()> {
    let publications = bundle.directory.join(PUBLICATIONS_DIR);
    std::fs::create_dir_all(&publications).map_err(|e| OutputError::io(&publications, e))?;
    for (source, target) in sources.iter().zip(&bundle.publication_files) {
        std::fs::copy(source, target).map_err(|e| OutputError::io(source, e))?;
    }
    manifest.write(&bundle.manifest_path)
}

/// Reports bundles whose publication folder does not hold `expected` files.
///
/// A missing `bundle_publications` folder counts as zero files.
pub fn check_completeness(output_root: &Path, expected: usize) -> Result<Vec<Defect>> {
    let mut bundles = Vec::new();
    let entries = std::fs::read_dir(output_root).map_err(|e| OutputError::io(output_root, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| OutputError::io(output_root, e))?;
        if entry.path().is_dir() {
            bundles.push(entry.path());
        }
    }
    bundles.sort();

    let mut defects = Vec::new();
    for bundle in bundles {
        let publications = bundle.join(PUBLICATIONS_DIR);
        let count = if publications.is_dir() {
            std::fs::read_dir(&publications)
                .map_err(|e| OutputError::io(&publications, e))?
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.path().is_file())
                .count()
        } else {
            0
        };
        if count != expected {
            let name = bundle
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            warn!(bundle = %name, count, expected, "bundle has wrong number of files");
            defects.push(Defect::new(
                DefectKind::WrongFileCount,
                name,
                format!("{count} publication files, expected {expected}"),
            ));
        }
    }
    Ok(defects)
}

/// One defect per file that was assigned to more than one record.
pub fn duplicate_assignments(assignments: &[Assignment]) -> Vec<Defect> {
    duplicate_files(assignments)
        .into_iter()
        .map(|(file, titles)| {
            warn!(file = %file, records = titles.len(), "file assigned more than once");
            Defect::new(
                DefectKind::DuplicateAssignment,
                file_stem(&file),
                format!("{file} assigned to {} records: {}", titles.len(), titles.join("; ")),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use confbundle_model::MatchTier;

    fn assignment(pdf: Option<&str>) -> Assignment {
        Assignment {
            record_index: 0,
            record_title: "T".to_string(),
            matched_pdf: pdf.map(str::to_string),
            matched_xml: None,
            matched_key: None,
            match_tier: MatchTier::Exact,
            warnings: Vec::new(),
        }
    }

    fn options(xml: bool) -> BundleOptions {
        BundleOptions {
            output_root: PathBuf::from("out"),
            pdf_dir: PathBuf::from("pdf"),
            xml_dir: xml.then(|| PathBuf::from("xml")),
            dry_run: true,
        }
    }

    #[test]
    fn bundle_names() {
        let pdf_only = BundleAssembler::new(options(false));
        assert_eq!(pdf_only.bundle_name(&assignment(Some("001_final-A.pdf")), 7), "bundle_007");

        let paired = BundleAssembler::new(options(true));
        assert_eq!(
            paired.bundle_name(&assignment(Some("001_final-Über.pdf")), 7),
            "001_final__ber"
        );
        assert_eq!(paired.bundle_name(&assignment(None), 12), "bundle_012");
    }

    #[test]
    fn expected_file_counts() {
        assert_eq!(options(false).expected_files(), 1);
        assert_eq!(options(true).expected_files(), 2);
    }

    #[test]
    fn duplicates_become_defects() {
        let mut second = assignment(Some("a.pdf"));
        second.record_title = "U".to_string();
        let defects = duplicate_assignments(&[assignment(Some("a.pdf")), second, assignment(None)]);
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind, DefectKind::DuplicateAssignment);
        assert_eq!(defects[0].message, "a.pdf assigned to 2 records: T; U");
    }
}
