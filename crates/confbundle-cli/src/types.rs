use std::path::PathBuf;

use confbundle_model::{DefectLog, MatchTier};

#[derive(Debug)]
pub struct RunResult {
    pub conference: String,
    pub output_root: PathBuf,
    /// `None` on dry runs.
    pub audit_csv: Option<PathBuf>,
    pub records: usize,
    pub bundles: Vec<BundleSummary>,
    pub defects: DefectLog,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub name: String,
    pub title: String,
    pub pdf: Option<String>,
    pub xml: Option<String>,
    pub match_tier: MatchTier,
    pub status: BundleStatus,
    pub warnings: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    Created,
    Planned,
    Skipped,
}

impl BundleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Planned => "planned",
            Self::Skipped => "skipped",
        }
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    CompletedWithDefects,
}

impl RunOutcome {
    /// Process exit code. Aborted runs exit with 1 before an outcome exists.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::CompletedWithDefects => 3,
        }
    }
}

impl RunResult {
    pub fn outcome(&self) -> RunOutcome {
        if self.defects.is_empty() {
            RunOutcome::Clean
        } else {
            RunOutcome::CompletedWithDefects
        }
    }

    pub fn count(&self, status: BundleStatus) -> usize {
        self.bundles.iter().filter(|b| b.status == status).count()
    }
}
