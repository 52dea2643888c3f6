use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use feat_cli::types::{FileSummary, RunResult};
use feat_model::StageKind;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input_dir.display());
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.generated_sample {
        println!("Sample data: {}", path.display());
    }

    let mut table = Table::new();
    let mut header = vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Before"),
    ];
    header.extend(StageKind::ALL.iter().map(|stage| header_cell(stage.slug())));
    header.extend([
        header_cell("After"),
        header_cell("Added"),
        header_cell("Anomalous"),
    ]);
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 1..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_added = 0usize;
    let mut total_anomalous = 0usize;
    for summary in &result.files {
        total_rows += summary.rows;
        total_added += summary.added_features();
        total_anomalous += summary.anomalous_rows;
        table.add_row(summary_row(summary));
    }
    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ];
    total.extend(StageKind::ALL.iter().map(|_| dim_cell("-")));
    total.extend([
        dim_cell("-"),
        Cell::new(total_added).add_attribute(Attribute::Bold),
        count_cell(total_anomalous, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table.add_row(total);
    println!("{table}");

    if !result.errors.is_empty() {
        print_error_table(result);
    }
    println!("Duration: {:.2}s", result.duration.as_secs_f64());
}

fn summary_row(summary: &FileSummary) -> Vec<Cell> {
    let mut row = vec![
        Cell::new(&summary.file_name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.rows),
        Cell::new(summary.original_columns),
    ];
    for stage in StageKind::ALL {
        let cell = match summary.stages.iter().find(|delta| delta.stage == stage) {
            Some(delta) if delta.added() > 0 => Cell::new(format!("+{}", delta.added())).fg(Color::Green),
            Some(delta) => dim_cell(format!("+0 ({} skipped)", delta.skipped)),
            None => dim_cell("-"),
        };
        row.push(cell);
    }
    row.extend([
        Cell::new(summary.final_columns),
        Cell::new(summary.added_features()).add_attribute(Attribute::Bold),
        count_cell(summary.anomalous_rows, Color::Yellow),
    ]);
    row
}

fn print_error_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Error")]);
    apply_table_style(&mut table);
    for failure in &result.errors {
        table.add_row(vec![
            Cell::new(&failure.file_name).fg(Color::Red),
            Cell::new(&failure.message),
        ]);
    }
    eprintln!("{table}");
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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
