//! Run summary rendering.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dqi_cli::pipeline::RunResult;
use dqi_model::DqiCategory;

const CATEGORY_ORDER: [DqiCategory; 5] = [
    DqiCategory::Excellent,
    DqiCategory::Good,
    DqiCategory::Acceptable,
    DqiCategory::NeedsAttention,
    DqiCategory::Critical,
];

pub fn print_summary(result: &RunResult) {
    println!("Project: {}", result.project);
    println!("Database: {}", result.db_path.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Subjects")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for category in CATEGORY_ORDER {
        let count = result.category_counts.get(&category).copied().unwrap_or(0);
        table.add_row(vec![category_cell(category), count_row_cell(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.subjects).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut clean_table = Table::new();
    clean_table.set_header(vec![header_cell("Clean Status"), header_cell("Subjects")]);
    apply_summary_table_style(&mut clean_table);
    align_column(&mut clean_table, 1, CellAlignment::Right);
    clean_table.add_row(vec![
        Cell::new("Clean").fg(Color::Green),
        count_row_cell(result.clean),
    ]);
    clean_table.add_row(vec![
        Cell::new("Not Clean").fg(Color::Yellow),
        count_row_cell(result.not_clean),
    ]);
    println!("{clean_table}");

    let report = &result.report;
    println!(
        "Reconciled {} event rows across {} subjects ({} latest visits backfilled)",
        report.event_rows, report.subjects, report.latest_visits_backfilled
    );
    if report.unresolved_sites > 0 {
        eprintln!(
            "warning: {} event rows kept an unresolved site id",
            report.unresolved_sites
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
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

fn category_cell(category: DqiCategory) -> Cell {
    let cell = Cell::new(category.as_str());
    match category {
        DqiCategory::Excellent => cell.fg(Color::Green),
        DqiCategory::Good => cell.fg(Color::Blue),
        DqiCategory::Acceptable => cell,
        DqiCategory::NeedsAttention => cell.fg(Color::Yellow),
        DqiCategory::Critical => cell.fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

fn count_row_cell(count: usize) -> Cell {
    if count == 0 {
        Cell::new(count).fg(Color::DarkGrey)
    } else {
        Cell::new(count)
    }
}
