//! Console rendering of result tables

use crate::search::{ResultRow, ResultTable};

/// Columns shown on the console, in order
const COLUMNS: [&str; 6] = ["title", "price", "mileage", "location", "url", "source"];

/// Placeholder for absent values
const MISSING: &str = "-";

fn cells(row: &ResultRow) -> [&str; 6] {
    [
        row.title.as_deref().unwrap_or(MISSING),
        row.price.as_deref().unwrap_or(MISSING),
        row.mileage.as_deref().unwrap_or(MISSING),
        row.location.as_deref().unwrap_or(MISSING),
        row.url.as_str(),
        row.source.as_str(),
    ]
}

/// Renders the table as left-aligned, space-padded text
///
/// Only the display columns are included; `price_num` is left to the CSV.
pub fn render_table(table: &ResultTable) -> String {
    let rows: Vec<[&str; 6]> = table.iter().map(cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &COLUMNS, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Prints the table to stdout
pub fn print_table(table: &ResultTable) {
    print!("{}", render_table(table));
}
