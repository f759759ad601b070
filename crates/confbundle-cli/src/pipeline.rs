//! Conference run stages.
//!
//! `run_conference` chains them: load, inventory, match, assemble, check and
//! report. Structural problems abort with an error; everything else ends up
//! in the run's defect log.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use confbundle_ingest::{FileInventory, InventoryOptions, check_pairing, load_metadata};
use confbundle_match::{CandidateSet, MatchEngine, candidates};
use confbundle_model::{Assignment, DefectLog, PublicationRecord};
use confbundle_output::{
    AssemblyOutcome, AuditRow, BundleAssembler, BundleOptions, check_completeness,
    duplicate_assignments, write_audit_csv,
};

use crate::types::{BundleStatus, BundleSummary, RunResult};

/// Fully resolved inputs of one conference run.
#[derive(Debug, Clone)]
pub struct ConferenceRequest {
    pub name: String,
    pub metadata: PathBuf,
    pub pdf_dir: PathBuf,
    pub xml_dir: Option<PathBuf>,
    /// Directory that receives the bundle directories.
    pub output_root: PathBuf,
    pub audit_csv: PathBuf,
    pub sequenced: bool,
    pub dry_run: bool,
    pub inventory: InventoryOptions,
}

/// Inventories of one run.
pub struct Inventories {
    pub pdf: FileInventory,
    pub xml: Option<FileInventory>,
}

pub fn run_conference(request: &ConferenceRequest) -> Result<RunResult> {
    let span = info_span!("conference", name = %request.name);
    let _guard = span.enter();
    let mut defects = DefectLog::default();

    let records = load_metadata(&request.metadata)
        .with_context(|| format!("load metadata {}", request.metadata.display()))?;
    let inventories = inventory(request)?;
    let assignments = assign(request, &inventories, &records, &mut defects)?;

    let assembler = BundleAssembler::new(BundleOptions {
        output_root: request.output_root.clone(),
        pdf_dir: request.pdf_dir.clone(),
        xml_dir: request.xml_dir.clone(),
        dry_run: request.dry_run,
    });
    if !request.dry_run {
        std::fs::create_dir_all(&request.output_root)
            .with_context(|| format!("create {}", request.output_root.display()))?;
    }

    let mut bundles = Vec::with_capacity(assignments.len());
    let mut rows = Vec::with_capacity(assignments.len());
    for (ordinal, (record, assignment)) in records.iter().zip(&assignments).enumerate() {
        let outcome = assembler
            .assemble(record, assignment, ordinal + 1)
            .with_context(|| format!("assemble bundle for {}", assignment.record_title))?;
        defects.extend(outcome.defects().iter().cloned());
        rows.push(AuditRow::new(&outcome, assignment));
        bundles.push(summarize(&outcome, assignment));
    }

    let audit_csv = if request.dry_run {
        None
    } else {
        let expected = assembler.options().expected_files();
        defects.extend(
            check_completeness(&request.output_root, expected).context("check bundle contents")?,
        );
        write_audit_csv(&request.audit_csv, &rows, request.xml_dir.is_some())
            .context("write audit report")?;
        Some(request.audit_csv.clone())
    };

    if !defects.is_empty() {
        warn!(defects = defects.len(), "run completed with defects");
    }
    info!(records = records.len(), bundles = bundles.len(), "run complete");
    Ok(RunResult {
        conference: request.name.clone(),
        output_root: request.output_root.clone(),
        audit_csv,
        records: records.len(),
        bundles,
        defects,
        dry_run: request.dry_run,
    })
}

/// Builds the PDF (and XML) inventories and checks that they pair up.
pub fn inventory(request: &ConferenceRequest) -> Result<Inventories> {
    let pdf = FileInventory::build(&request.pdf_dir, &request.inventory)
        .with_context(|| format!("inventory {}", request.pdf_dir.display()))?;
    let xml = match &request.xml_dir {
        Some(dir) => {
            let xml = FileInventory::build(dir, &request.inventory)
                .with_context(|| format!("inventory {}", dir.display()))?;
            check_pairing(&pdf, &xml)?;
            Some(xml)
        }
        None => None,
    };
    info!(
        pdf = pdf.len(),
        xml = xml.as_ref().map_or(0, FileInventory::len),
        "built inventories"
    );
    Ok(Inventories { pdf, xml })
}

/// Matches files to records and records the resulting defects.
pub fn assign(
    request: &ConferenceRequest,
    inventories: &Inventories,
    records: &[PublicationRecord],
    defects: &mut DefectLog,
) -> Result<Vec<Assignment>> {
    let mut engine = MatchEngine::new(&inventories.pdf);
    if let Some(xml) = &inventories.xml {
        engine = engine.with_xml(xml);
    }

    let assignments = if request.sequenced {
        engine.assign_sequenced(records)?
    } else {
        let mut sets: Vec<CandidateSet> = Vec::with_capacity(records.len());
        for record in records {
            let (set, record_defects) = candidates(record);
            defects.extend(record_defects);
            sets.push(set);
        }
        engine.assign(records, &sets)?
    };
    defects.extend(engine.defects(&assignments));
    defects.extend(duplicate_assignments(&assignments));
    Ok(assignments)
}

fn summarize(outcome: &AssemblyOutcome, assignment: &Assignment) -> BundleSummary {
    let status = match outcome {
        AssemblyOutcome::Created { .. } => BundleStatus::Created,
        AssemblyOutcome::Planned { .. } => BundleStatus::Planned,
        AssemblyOutcome::Skipped { .. } => BundleStatus::Skipped,
    };
    BundleSummary {
        name: outcome.bundle_name().to_string(),
        title: assignment.record_title.clone(),
        pdf: assignment.matched_pdf.clone(),
        xml: assignment.matched_xml.clone(),
        match_tier: assignment.match_tier,
        status,
        warnings: assignment.warnings.len() + outcome.defects().len(),
    }
}
