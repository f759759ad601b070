//! Record- and assembly-level defects.
//!
//! Defects never stop a run. They are collected, logged and written to the
//! audit report so a reviewer can correct the bundle set by hand.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    MissingTitle,
    MissingCreators,
    MissingField,
    PositionalFallback,
    MissingPair,
    CountMismatch,
    DuplicateAssignment,
    BundleExists,
    WrongFileCount,
    UnreadableXmlTitle,
}

impl DefectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTitle => "missing title",
            Self::MissingCreators => "missing creators",
            Self::MissingField => "missing field",
            Self::PositionalFallback => "positional fallback",
            Self::MissingPair => "missing pair",
            Self::CountMismatch => "count mismatch",
            Self::DuplicateAssignment => "duplicate assignment",
            Self::BundleExists => "bundle exists",
            Self::WrongFileCount => "wrong file count",
            Self::UnreadableXmlTitle => "unreadable xml title",
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found while matching or assembling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub kind: DefectKind,
    /// What the defect is about: a record title, bundle name or filename.
    pub subject: String,
    pub message: String,
}

impl Defect {
    pub fn new(kind: DefectKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Accumulated defects of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefectLog {
    pub defects: Vec<Defect>,
}

impl DefectLog {
    pub fn push(&mut self, defect: Defect) {
        self.defects.push(defect);
    }

    pub fn extend(&mut self, defects: impl IntoIterator<Item = Defect>) {
        self.defects.extend(defects);
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn count(&self, kind: DefectKind) -> usize {
        self.defects.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Defect> {
        self.defects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defect_display() {
        let defect = Defect::new(DefectKind::BundleExists, "bundle_001", "directory already exists");
        assert_eq!(
            defect.to_string(),
            "[bundle exists] bundle_001: directory already exists"
        );
    }

    #[test]
    fn log_counts_by_kind() {
        let mut log = DefectLog::default();
        log.push(Defect::new(DefectKind::MissingTitle, "#1", "no title"));
        log.push(Defect::new(DefectKind::MissingTitle, "#2", "no title"));
        log.push(Defect::new(DefectKind::WrongFileCount, "b", "1 of 2 files"));
        assert_eq!(log.len(), 3);
        assert_eq!(log.count(DefectKind::MissingTitle), 2);
        assert_eq!(log.count(DefectKind::CountMismatch), 0);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&DefectKind::PositionalFallback).expect("serialize");
        assert_eq!(json, "\"positional_fallback\"");
    }
}
