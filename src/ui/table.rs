// SolarMaint - ui/table.rs
//
// Plain-text record table with per-column widths.
// Widths are counted in chars; wide glyphs are not special-cased.

use crate::core::model::ParsedRecord;
use crate::util::constants::ABSENT_PLACEHOLDER;
use std::fmt::Write;

/// Column titles, in display order.
const HEADERS: [&str; 5] = [
    "Classification",
    "Equipment type",
    "Equipment",
    "Description",
    "Sent by",
];

/// Cut `text` to at most `max` chars, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn cells(record: &ParsedRecord) -> [&str; 5] {
    [
        record
            .classification
            .map(|c| c.keyword())
            .unwrap_or(ABSENT_PLACEHOLDER),
        record
            .equipment_type
            .as_deref()
            .unwrap_or(ABSENT_PLACEHOLDER),
        record.equipment.as_str(),
        record.description.as_str(),
        record.sender.as_str(),
    ]
}

/// Append a table of `records` to `out`.
pub fn render_table(out: &mut String, records: &[&ParsedRecord], max_cell_width: usize) {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| cells(r).map(|c| truncate(c, max_cell_width)))
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);
    for row in &rows {
        write_row(out, row, &widths);
    }
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let _ = write!(line, "{:<width$}", cell.as_ref(), width = *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
