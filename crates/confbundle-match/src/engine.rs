//! Record to file assignment.

use tracing::{debug, info, warn};

use confbundle_ingest::{FileInventory, InventoryEntry, file_stem};
use confbundle_model::{Assignment, Defect, DefectKind, MatchTier, PublicationRecord};

use crate::candidates::CandidateSet;
use crate::error::{MatchError, Result};

/// Assigns PDF (and optionally XML) files to publication records.
///
/// Records are processed in metadata order. Each record tries the exact and
/// truncated-key tiers and otherwise takes the file at its own position in
/// the sorted inventory. Keys stay available after a match, so one file can
/// be picked for several records; [`duplicate_files`] reports that.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'a> {
    pdf: &'a FileInventory,
    xml: Option<&'a FileInventory>,
}

impl<'a> MatchEngine<'a> {
    pub fn new(pdf: &'a FileInventory) -> Self {
        Self { pdf, xml: None }
    }

    /// Enables PDF+XML mode: every assigned PDF gets its same-stem XML.
    pub fn with_xml(mut self, xml: &'a FileInventory) -> Self {
        self.xml = Some(xml);
        self
    }

    pub fn has_xml(&self) -> bool {
        self.xml.is_some()
    }

    /// Assigns one file per record by filename heuristics.
    ///
    /// `candidate_sets[i]` must belong to `records[i]`.
    pub fn assign(
        &self,
        records: &[PublicationRecord],
        candidate_sets: &[CandidateSet],
    ) -> Result<Vec<Assignment>> {
        if self.pdf.is_empty() {
            return Err(MatchError::EmptyInventory {
                path: self.pdf.directory().to_path_buf(),
            });
        }
        if records.len() != candidate_sets.len() {
            return Err(MatchError::CandidateCountMismatch {
                records: records.len(),
                candidate_sets: candidate_sets.len(),
            });
        }
        if records.len() != self.pdf.len() {
            warn!(
                records = records.len(),
                files = self.pdf.len(),
                "record and file counts differ"
            );
        }

        let mut assignments = Vec::with_capacity(records.len());
        for (position_counter, (record, set)) in records.iter().zip(candidate_sets).enumerate() {
            assignments.push(self.assign_one(record, set, position_counter));
        }

        let matched = assignments
            .iter()
            .filter(|a| a.match_tier.is_name_match())
            .count();
        info!(
            records = records.len(),
            matched,
            fallback = assignments.len() - matched,
            "assigned publication files"
        );
        Ok(assignments)
    }

    /// Assigns the i-th sorted file to the i-th record.
    pub fn assign_sequenced(&self, records: &[PublicationRecord]) -> Result<Vec<Assignment>> {
        let pools = std::iter::once(self.pdf).chain(self.xml);
        for pool in pools {
            if pool.files().len() != records.len() {
                return Err(MatchError::SequenceLengthMismatch {
                    path: pool.directory().to_path_buf(),
                    records: records.len(),
                    files: pool.files().len(),
                });
            }
        }

        let assignments = records
            .iter()
            .enumerate()
            .map(|(i, record)| Assignment {
                record_index: record.index,
                record_title: record.display_title(),
                matched_pdf: self.pdf.files().get(i).cloned(),
                matched_xml: self.xml.and_then(|xml| xml.files().get(i).cloned()),
                matched_key: None,
                match_tier: MatchTier::Sequenced,
                warnings: Vec::new(),
            })
            .collect::<Vec<_>>();
        info!(records = assignments.len(), "assigned publication files by order");
        Ok(assignments)
    }

    /// Defects implied by a finished assignment list.
    ///
    /// Files picked for several records are not included here; see
    /// [`duplicate_files`].
    pub fn defects(&self, assignments: &[Assignment]) -> Vec<Defect> {
        let mut defects = Vec::new();
        if assignments.len() != self.pdf.len() {
            defects.push(Defect::new(
                DefectKind::CountMismatch,
                self.pdf.directory().display().to_string(),
                format!(
                    "{} records but {} publication files",
                    assignments.len(),
                    self.pdf.len()
                ),
            ));
        }
        for assignment in assignments {
            if assignment.match_tier == MatchTier::PositionalFallback {
                defects.push(Defect::new(
                    DefectKind::PositionalFallback,
                    &assignment.record_title,
                    assignment.warnings.join("; "),
                ));
            }
            if let (Some(_), Some(pdf)) = (self.xml, assignment.matched_pdf.as_deref())
                && assignment.matched_xml.is_none()
            {
                defects.push(Defect::new(
                    DefectKind::MissingPair,
                    &assignment.record_title,
                    format!("no xml file with the stem of {pdf}"),
                ));
            }
        }
        defects
    }

    fn assign_one(
        &self,
        record: &PublicationRecord,
        set: &CandidateSet,
        position_counter: usize,
    ) -> Assignment {
        let title = record.display_title();
        let mut assignment = Assignment {
            record_index: record.index,
            record_title: title.clone(),
            matched_pdf: None,
            matched_xml: None,
            matched_key: None,
            match_tier: MatchTier::PositionalFallback,
            warnings: Vec::new(),
        };

        let picked = match self.exact_match(set) {
            Some(entry) => Some((entry, MatchTier::Exact)),
            None => self
                .truncated_match(set)
                .map(|entry| (entry, MatchTier::TruncatedSuffix)),
        };

        match picked {
            Some((entry, tier)) => {
                debug!(title = %title, key = %entry.comparison_key, tier = %tier, "matched");
                assignment.matched_pdf = Some(entry.actual_filename.clone());
                assignment.matched_key = Some(entry.comparison_key.clone());
                assignment.match_tier = tier;
            }
            None => match self.pdf.at(position_counter) {
                Some(entry) => {
                    let message = format!(
                        "no filename match for '{title}'; assigned {} by position {}",
                        entry.actual_filename,
                        position_counter + 1
                    );
                    warn!(title = %title, file = %entry.actual_filename, "positional fallback");
                    assignment.matched_pdf = Some(entry.actual_filename.clone());
                    assignment.matched_key = Some(entry.comparison_key.clone());
                    assignment.warnings.push(message);
                }
                None => {
                    let message = format!(
                        "no filename match for '{title}' and no file left at position {}",
                        position_counter + 1
                    );
                    warn!(title = %title, position = position_counter + 1, "no file for record");
                    assignment.warnings.push(message);
                }
            },
        }

        if let (Some(xml), Some(pdf)) = (self.xml, assignment.matched_pdf.as_deref()) {
            let stem = file_stem(pdf);
            match xml.find_by_stem(stem) {
                Some(partner) => assignment.matched_xml = Some(partner.to_string()),
                None => {
                    warn!(file = %pdf, "no xml partner");
                    assignment
                        .warnings
                        .push(format!("no xml file with stem '{stem}'"));
                }
            }
        }
        assignment
    }

    /// Last (candidate, key) pair where the candidate contains the key.
    fn exact_match(&self, set: &CandidateSet) -> Option<&'a InventoryEntry> {
        self.scan(set, |key| Some(key))
    }

    /// Same scan as [`Self::exact_match`] with each key's last character dropped.
    fn truncated_match(&self, set: &CandidateSet) -> Option<&'a InventoryEntry> {
        self.scan(set, |key| {
            let mut chars = key.chars();
            chars.next_back()?;
            Some(chars.as_str())
        })
    }

    fn scan(
        &self,
        set: &CandidateSet,
        needle: impl Fn(&str) -> Option<&str>,
    ) -> Option<&'a InventoryEntry> {
        let mut picked = None;
        for candidate in set.iter() {
            for entry in self.pdf.entries() {
                match needle(entry.comparison_key.as_str()) {
                    Some(key) if !key.is_empty() && candidate.contains(key) => {
                        picked = Some(entry);
                    }
                    _ => {}
                }
            }
        }
        picked
    }
}

/// Files assigned to more than one record, with the titles of those records.
pub fn duplicate_files(assignments: &[Assignment]) -> Vec<(String, Vec<String>)> {
    let mut by_file: std::collections::BTreeMap<&str, Vec<String>> =
        std::collections::BTreeMap::new();
    for assignment in assignments {
        if let Some(pdf) = assignment.matched_pdf.as_deref() {
            by_file
                .entry(pdf)
                .or_default()
                .push(assignment.record_title.clone());
        }
    }
    by_file
        .into_iter()
        .filter(|(_, records)| records.len() > 1)
        .map(|(file, records)| (file.to_string(), records))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::candidates;
    use confbundle_ingest::InventoryOptions;
    use confbundle_model::XmlNode;
    use std::path::Path;

    fn inventory(dir: &str, names: &[&str]) -> FileInventory {
        FileInventory::from_filenames(
            Path::new(dir),
            names.iter().map(|n| (*n).to_string()).collect(),
            &InventoryOptions::default(),
        )
        .unwrap()
    }

    fn record(index: usize, title: &str, creators: &[&str]) -> PublicationRecord {
        PublicationRecord {
            index,
            title: Some(title.to_string()),
            raw_title: Some(title.to_string()),
            creators: creators.iter().map(|c| (*c).to_string()).collect(),
            raw: XmlNode::new("metadata"),
        }
    }

    fn run(engine: &MatchEngine<'_>, records: &[PublicationRecord]) -> Vec<Assignment> {
        let sets: Vec<CandidateSet> = records.iter().map(|r| candidates(r).0).collect();
        engine.assign(records, &sets).unwrap()
    }

    #[test]
    fn exact_match_on_noise_stripped_key() {
        let pdf = inventory("pdf", &["001_final-SMITH_John_Big_Data.pdf", "002_final-DOE_Jane_Texts.pdf"]);
        let records = vec![
            record(0, "Texts", &["Doe, Jane"]),
            record(1, "Big Data", &["Smith, John"]),
        ];
        let assignments = run(&MatchEngine::new(&pdf), &records);

        assert_eq!(assignments[0].matched_pdf.as_deref(), Some("002_final-DOE_Jane_Texts.pdf"));
        assert_eq!(assignments[0].match_tier, MatchTier::Exact);
        assert_eq!(assignments[1].matched_key.as_deref(), Some("SMITH_John_Big_Data"));
        assert!(assignments.iter().all(|a| a.warnings.is_empty()));
    }

    #[test]
    fn last_matching_key_wins() {
        // both keys are substrings of the candidate; the later one in sorted order wins
        let pdf = inventory("pdf", &["SMITH_John_Big.pdf", "SMITH_John_Big_Data.pdf"]);
        let assignments = run(&MatchEngine::new(&pdf), &[record(0, "Big Data", &["Smith, John"])]);
        assert_eq!(assignments[0].matched_pdf.as_deref(), Some("SMITH_John_Big_Data.pdf"));
    }

    #[test]
    fn truncated_key_matches_trailing_character() {
        let pdf = inventory("pdf", &["001_final-LEE_Kim_Netzwerke2.pdf"]);
        let assignments = run(&MatchEngine::new(&pdf), &[record(0, "Netzwerke", &["Lee, Kim"])]);
        assert_eq!(assignments[0].match_tier, MatchTier::TruncatedSuffix);
        assert_eq!(
            assignments[0].matched_pdf.as_deref(),
            Some("001_final-LEE_Kim_Netzwerke2.pdf")
        );
    }

    #[test]
    fn fallback_uses_record_position() {
        let pdf = inventory("pdf", &["A.pdf", "B.pdf"]);
        let records = vec![
            record(0, "Unrelated", &["Roe, Max"]),
            record(1, "Other", &["Poe, Ed"]),
            record(2, "Third", &["Zoe, Li"]),
        ];
        let engine = MatchEngine::new(&pdf);
        let assignments = run(&engine, &records);

        assert_eq!(assignments[1].matched_pdf.as_deref(), Some("B.pdf"));
        assert_eq!(assignments[1].match_tier, MatchTier::PositionalFallback);
        assert!(assignments[1].warnings[0].contains("Other"));
        assert!(assignments[1].warnings[0].contains("B.pdf"));
        assert_eq!(assignments[2].matched_pdf, None);
        assert!(assignments[2].warnings[0].contains("no file left"));

        let kinds: Vec<DefectKind> = engine.defects(&assignments).iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DefectKind::CountMismatch,
                DefectKind::PositionalFallback,
                DefectKind::PositionalFallback,
                DefectKind::PositionalFallback,
            ]
        );
    }

    #[test]
    fn xml_partner_by_stem() {
        let pdf = inventory("pdf", &["001_final-LEE_Kim_Netze.pdf"]);
        let xml = inventory("xml", &["001_final-LEE_Kim_Netze.xml"]);
        let engine = MatchEngine::new(&pdf).with_xml(&xml);
        let assignments = run(&engine, &[record(0, "Netze", &["Lee, Kim"])]);
        assert_eq!(assignments[0].matched_xml.as_deref(), Some("001_final-LEE_Kim_Netze.xml"));
        assert!(engine.defects(&assignments).is_empty());
    }

    #[test]
    fn candidate_count_must_match_records() {
        let pdf = inventory("pdf", &["A.pdf"]);
        let err = MatchEngine::new(&pdf)
            .assign(&[record(0, "A", &[])], &[])
            .unwrap_err();
        assert!(matches!(err, MatchError::CandidateCountMismatch { records: 1, candidate_sets: 0 }));
    }

    #[test]
    fn sequenced_assigns_by_order() {
        let pdf = inventory("pdf", &["b.pdf", "a.pdf"]);
        let xml = inventory("xml", &["a.xml", "b.xml"]);
        let engine = MatchEngine::new(&pdf).with_xml(&xml);
        let records = vec![record(0, "First", &[]), record(1, "Second", &[])];
        let assignments = engine.assign_sequenced(&records).unwrap();
        assert_eq!(assignments[0].matched_pdf.as_deref(), Some("a.pdf"));
        assert_eq!(assignments[1].matched_xml.as_deref(), Some("b.xml"));
        assert!(assignments.iter().all(|a| a.match_tier == MatchTier::Sequenced));

        let err = engine.assign_sequenced(&records[..1]).unwrap_err();
        assert!(matches!(err, MatchError::SequenceLengthMismatch { records: 1, files: 2, .. }));
    }

    #[test]
    fn duplicate_files_are_listed() {
        let pdf = inventory("pdf", &["SMITH_John_A.pdf"]);
        let records = vec![
            record(0, "A", &["Smith, John"]),
            record(1, "A again", &["Smith, John"]),
        ];
        let assignments = run(&MatchEngine::new(&pdf), &records);
        let duplicates = duplicate_files(&assignments);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, "SMITH_John_A.pdf");
    }
}
