use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::debug;

use confbundle_cli::config::AppConfig;
use confbundle_cli::pipeline::{ConferenceRequest, run_conference};
use confbundle_cli::types::RunResult;
use confbundle_ingest::FileInventory;

use crate::cli::BundleArgs;
use crate::summary::apply_table_style;

pub fn run_bundle(args: &BundleArgs, config: &AppConfig) -> Result<RunResult> {
    let request = build_request(args, config)?;
    debug!(?request, "resolved conference paths");
    run_conference(&request)
}

/// Resolves CLI arguments against the configured base directories.
fn build_request(args: &BundleArgs, config: &AppConfig) -> Result<ConferenceRequest> {
    let input_dir = config.paths.input_base.join(&args.name);
    Ok(ConferenceRequest {
        name: args.name.clone(),
        metadata: args.metadata.clone(),
        pdf_dir: input_dir.join(&args.pdf),
        xml_dir: args.xml.as_ref().map(|xml| input_dir.join(xml)),
        output_root: args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.paths.output_base.join(&args.name)),
        audit_csv: config
            .paths
            .assignments_dir
            .join(format!("{}.csv", args.name)),
        sequenced: args.sequenced,
        dry_run: args.dry_run,
        inventory: config.inventory_options()?,
    })
}

pub fn run_inspect(dir: &Path, config: &AppConfig) -> Result<()> {
    let options = config.inventory_options()?;
    let inventory = FileInventory::build(dir, &options)
        .with_context(|| format!("inventory {}", dir.display()))?;

    println!("Directory: {}", inventory.directory().display());
    println!("Format: {}", inventory.extension());
    let mut table = Table::new();
    table.set_header(vec!["#", "Comparison key", "File"]);
    apply_table_style(&mut table);
    for (position, entry) in inventory.entries().iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            entry.comparison_key.clone(),
            entry.actual_filename.clone(),
        ]);
    }
    println!("{table}");
    let collapsed = inventory.files().len() - inventory.len();
    if collapsed > 0 {
        println!("{collapsed} file(s) share a comparison key with another file");
    }
    Ok(())
}
