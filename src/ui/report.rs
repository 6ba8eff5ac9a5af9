// SolarMaint - ui/report.rs
//
// Text report over the current AppState: period header, all-activities
// table, one section per classification, statistics and a distribution
// chart. Rendered into a String so main.rs decides where it goes.

use crate::app::state::AppState;
use crate::core::model::{Classification, RecordSummary};
use crate::ui::table::{render_table, truncate};
use crate::util::constants::ABSENT_PLACEHOLDER;
use std::fmt::Write;

/// Rendering options, filled from config and CLI.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Width of the longest bar in the distribution chart.
    pub bar_width: usize,
    /// Maximum table cell width.
    pub max_cell_width: usize,
    /// Show only this classification's section instead of all five.
    pub only: Option<Classification>,
}

/// Render the complete report.
pub fn render(state: &AppState, options: &ReportOptions) -> String {
    let mut out = String::new();

    let Some(range) = state.date_range else {
        out.push_str("No dated messages found in the file.\n");
        return out;
    };

    if let Some((lo, hi)) = state.available {
        let _ = writeln!(out, "Available period: {lo} to {hi}");
    }

    if state.messages_in_range() == 0 {
        out.push_str("No messages for the selected period.\n");
        return out;
    }

    heading(&mut out, &format!("Messages from {} to {}", range.start(), range.end()));

    if state.records.is_empty() {
        out.push_str("No data found to process in the messages.\n");
        return out;
    }

    render_choices(&mut out, state);

    let view = state.filtered_records();

    if options.only.is_none() {
        heading(&mut out, "All activities");
        if view.is_empty() {
            out.push_str("No records match the current filters.\n");
        } else {
            render_table(&mut out, &view, options.max_cell_width);
        }
    }

    for (class, records) in state.by_classification() {
        if options.only.is_some_and(|only| only != class) {
            continue;
        }
        heading(&mut out, class.label());
        if records.is_empty() {
            out.push_str("No records in this classification.\n");
        } else {
            render_table(&mut out, &records, options.max_cell_width);
        }
    }

    let summary = state.summary();
    render_statistics(&mut out, &summary);
    render_distribution(&mut out, &summary, options.bar_width);

    out
}

fn heading(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "### {title}");
}

/// Values accepted by the equipment type and equipment filters.
fn render_choices(out: &mut String, state: &AppState) {
    heading(out, "Filter values");
    let types: Vec<&str> = state
        .equipment_type_choices()
        .into_iter()
        .map(|t| t.unwrap_or(ABSENT_PLACEHOLDER))
        .collect();
    let _ = writeln!(out, "Equipment types: {}", types.join(", "));

    let equipment = state.equipment_choices().join(", ");
    match state.filter.equipment_type.as_deref() {
        Some(selected) => {
            let _ = writeln!(out, "Equipment ({selected}): {equipment}");
        }
        None => {
            let _ = writeln!(out, "Equipment: {equipment}");
        }
    }
}

/// Statistics block: record count and distinct equipment types.
pub fn render_statistics(out: &mut String, summary: &RecordSummary) {
    heading(out, "Statistics");
    let _ = writeln!(out, "Total records:   {}", summary.total_records);
    let _ = writeln!(out, "Equipment types: {}", summary.distinct_equipment_types);
}

/// Horizontal bar chart of records per classification. Bars scale so the
/// largest count spans `bar_width` characters; any non-zero count gets at
/// least one character.
pub fn render_distribution(out: &mut String, summary: &RecordSummary, bar_width: usize) {
    heading(out, "Distribution by classification");

    let Some(max) = summary.by_classification.iter().map(|(_, n)| *n).max() else {
        out.push_str("No classified records.\n");
        return;
    };

    let label_width = summary
        .by_classification
        .iter()
        .map(|(c, _)| c.label().chars().count())
        .max()
        .unwrap_or(0);

    for (class, count) in &summary.by_classification {
        let len = ((count * bar_width) / max).max(1);
        let label = truncate(class.label(), label_width);
        let pad = label_width - label.chars().count();
        let _ = writeln!(
            out,
            "{label}{} | {} {count}",
            " ".repeat(pad),
            "#".repeat(len)
        );
    }
}
