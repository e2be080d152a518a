use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vigency_core::format_date;
use vigency_model::{QaItem, QaSeverity, SummaryTables};

use crate::types::{LookupResult, RunResult};

pub fn print_summary(result: &RunResult) {
    match &result.output_dir {
        Some(dir) => println!("Output: {} ({} files)", dir.display(), result.written.len()),
        None => println!("Output: dry run, nothing written"),
    }
    println!(
        "Evaluations: {} kept of {} rows ({} dropped, {} same-day discarded)",
        result.evaluation_audit.kept_rows,
        result.evaluation_audit.total_rows,
        result.evaluation_audit.total_dropped(),
        result.evaluation_audit.same_day_discarded,
    );
    println!(
        "Visits: {} kept of {} rows; {} patients with {} vigency intervals",
        result.visit_audit.kept_rows,
        result.visit_audit.total_rows,
        result.patients,
        result.intervals,
    );
    println!();
    println!("{}", diagnosis_table(&result.summaries, &result.sentinel));
    println!();
    println!("Data quality:");
    println!("{}", qa_table(&result.qa.items));
}

pub fn print_lookup(result: &LookupResult) {
    println!("Patient: {}", result.patient);
    println!("Date: {}", format_date(result.date));
    println!("Vigent diagnosis: {}", result.vigent.label(&result.sentinel));
    if let (Some(origin), Some(clinician)) = (
        result.vigent.origin_eval_date(),
        result.vigent.origin_clinician(),
    ) {
        println!("Since: {} ({})", format_date(origin), display_or_dash(clinician));
    }
    if result.intervals.is_empty() {
        println!("No evaluations on record for this patient.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Start"),
        header_cell("End"),
        header_cell("Diagnosis"),
        header_cell("Clinician"),
        header_cell("Evaluation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for interval in &result.intervals {
        let current = interval.contains(result.date);
        let diagnosis = Cell::new(&interval.diagnosis);
        table.add_row(vec![
            Cell::new(format_date(interval.start)),
            interval
                .end
                .map_or_else(|| dim_cell("open"), |end| Cell::new(format_date(end))),
            if current {
                diagnosis.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                diagnosis
            },
            Cell::new(display_or_dash(&interval.clinician)),
            Cell::new(interval.source_evaluation_id),
        ]);
    }
    println!("{table}");
}

fn diagnosis_table(summaries: &SummaryTables, sentinel: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Diagnosis"),
        header_cell("Visits"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    let total = summaries.total_visits;
    for row in &summaries.by_diagnosis.rows {
        table.add_row(vec![
            Cell::new(&row.diagnosis).fg(Color::Blue),
            Cell::new(row.count),
            Cell::new(share(row.count, total)),
        ]);
    }
    table.add_row(vec![
        dim_cell(sentinel),
        count_cell(summaries.undiagnosed_visits, Color::Yellow),
        dim_cell(share(summaries.undiagnosed_visits, total)),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn qa_table(items: &[QaItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Severity"),
        header_cell("Count"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for item in items {
        let color = severity_color(item.severity);
        table.add_row(vec![
            Cell::new(item.category.label()),
            severity_cell(item.severity),
            if item.severity == QaSeverity::Info {
                Cell::new(item.count)
            } else {
                count_cell(item.count, color)
            },
            Cell::new(&item.detail),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn share(count: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn severity_cell(severity: QaSeverity) -> Cell {
    match severity {
        QaSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
        QaSeverity::Info => dim_cell("info"),
    }
}

fn severity_color(severity: QaSeverity) -> Color {
    match severity {
        QaSeverity::Warning => Color::Yellow,
        QaSeverity::Info => Color::DarkGrey,
    }
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
