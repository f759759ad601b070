use std::fmt;

use serde::{Deserialize, Serialize};

/// How a file was attached to a publication record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// A candidate name contains the file's comparison key.
    Exact,
    /// A candidate name contains the comparison key minus its last character.
    TruncatedSuffix,
    /// No name matched; the file at the current list position was used.
    PositionalFallback,
    /// Files are assigned strictly by order (sequenced conferences).
    Sequenced,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::TruncatedSuffix => "truncated",
            Self::PositionalFallback => "fallback",
            Self::Sequenced => "sequenced",
        }
    }

    /// Whether the assignment came from the filename heuristics.
    pub fn is_name_match(&self) -> bool {
        matches!(self, Self::Exact | Self::TruncatedSuffix)
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The files attached to one publication record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Position of the record in the metadata file.
    pub record_index: usize,
    /// Display title of the record.
    pub record_title: String,
    /// Actual PDF filename, if one was assigned.
    pub matched_pdf: Option<String>,
    /// Actual XML filename, if one was paired.
    pub matched_xml: Option<String>,
    /// Inventory comparison key that produced the match.
    pub matched_key: Option<String>,
    pub match_tier: MatchTier,
    /// Human-readable notes for the reviewer.
    pub warnings: Vec<String>,
}

impl Assignment {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Stem of the matched PDF (filename without extension).
    pub fn pdf_stem(&self) -> Option<&str> {
        self.matched_pdf
            .as_deref()
            .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pdf: Option<&str>) -> Assignment {
        Assignment {
            record_index: 0,
            record_title: "Title".to_string(),
            matched_pdf: pdf.map(str::to_string),
            matched_xml: None,
            matched_key: None,
            match_tier: MatchTier::Exact,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn pdf_stem_strips_extension() {
        assert_eq!(
            assignment(Some("001_final-A.b.pdf")).pdf_stem(),
            Some("001_final-A.b")
        );
        assert_eq!(assignment(Some("noext")).pdf_stem(), Some("noext"));
        assert_eq!(assignment(None).pdf_stem(), None);
    }

    #[test]
    fn tier_labels() {
        assert_eq!(MatchTier::TruncatedSuffix.to_string(), "truncated");
        assert!(MatchTier::Exact.is_name_match());
        assert!(!MatchTier::PositionalFallback.is_name_match());
    }
}
