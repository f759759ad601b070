use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use confbundle_cli::types::{BundleStatus, BundleSummary, RunResult};
use confbundle_model::{DefectKind, MatchTier};

pub fn print_summary(result: &RunResult) {
    println!("Conference: {}", result.conference);
    println!("Output: {}", result.output_root.display());
    if let Some(path) = &result.audit_csv {
        println!("Audit report: {}", path.display());
    }
    if result.dry_run {
        println!("Dry run: nothing was written");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bundle"),
        header_cell("Title"),
        header_cell("PDF"),
        header_cell("XML"),
        header_cell("Match"),
        header_cell("Status"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Right);
    let mut total_warnings = 0usize;
    for bundle in &result.bundles {
        total_warnings += bundle.warnings;
        table.add_row(bundle_row(bundle));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} records", result.records))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!(
            "{} new, {} skipped",
            result.count(BundleStatus::Created) + result.count(BundleStatus::Planned),
            result.count(BundleStatus::Skipped)
        ))
        .add_attribute(Attribute::Bold),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_defect_table(result);
}

fn bundle_row(bundle: &BundleSummary) -> Vec<Cell> {
    vec![
        Cell::new(&bundle.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&bundle.title),
        file_cell(bundle.pdf.as_deref()),
        file_cell(bundle.xml.as_deref()),
        tier_cell(bundle.match_tier),
        status_cell(bundle.status),
        count_cell(bundle.warnings, Color::Yellow),
    ]
}

fn print_defect_table(result: &RunResult) {
    if result.defects.is_empty() {
        return;
    }
    let mut defects: Vec<_> = result.defects.iter().collect();
    defects.sort_by_key(|defect| defect.kind);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for defect in defects {
        table.add_row(vec![
            kind_cell(defect.kind),
            Cell::new(&defect.subject),
            Cell::new(&defect.message),
        ]);
    }
    println!();
    println!("Defects:");
    println!("{table}");
}

fn file_cell(name: Option<&str>) -> Cell {
    match name {
        Some(name) => Cell::new(name),
        None => dim_cell("-"),
    }
}

fn tier_cell(tier: MatchTier) -> Cell {
    match tier {
        MatchTier::Exact | MatchTier::Sequenced => Cell::new(tier).fg(Color::Green),
        MatchTier::TruncatedSuffix => Cell::new(tier).fg(Color::Yellow),
        MatchTier::PositionalFallback => Cell::new(tier)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn status_cell(status: BundleStatus) -> Cell {
    match status {
        BundleStatus::Created => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        BundleStatus::Planned => dim_cell(status.as_str()),
        BundleStatus::Skipped => Cell::new(status.as_str()).fg(Color::Yellow),
    }
}

fn kind_cell(kind: DefectKind) -> Cell {
    let color = match kind {
        DefectKind::PositionalFallback
        | DefectKind::DuplicateAssignment
        | DefectKind::WrongFileCount
        | DefectKind::MissingPair => Color::Red,
        _ => Color::Yellow,
    };
    Cell::new(kind).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
