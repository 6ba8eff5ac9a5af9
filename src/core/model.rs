// SolarMaint - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Classification
// =============================================================================

/// Maintenance activity category announced by a keyword line in a message.
///
/// Declaration order is the keyword priority order: when one line contains
/// several keywords, the first variant listed here wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "CORRETIVA")]
    Corretiva,
    #[serde(rename = "PREVENTIVA")]
    Preventiva,
    #[serde(rename = "CONTENÇÃO VEGETAL")]
    ContencaoVegetal,
    #[serde(rename = "LAVAGEM DE MÓDULOS")]
    LavagemDeModulos,
    #[serde(rename = "MATERIAIS")]
    Materiais,
}

impl Classification {
    /// Returns all variants in priority order.
    pub fn all() -> &'static [Classification] {
        &[
            Classification::Corretiva,
            Classification::Preventiva,
            Classification::ContencaoVegetal,
            Classification::LavagemDeModulos,
            Classification::Materiais,
        ]
    }

    /// The literal that marks this classification inside message text.
    /// Matching is case-sensitive.
    pub fn keyword(&self) -> &'static str {
        match self {
            Classification::Corretiva => "CORRETIVA",
            Classification::Preventiva => "PREVENTIVA",
            Classification::ContencaoVegetal => "CONTENÇÃO VEGETAL",
            Classification::LavagemDeModulos => "LAVAGEM DE MÓDULOS",
            Classification::Materiais => "MATERIAIS",
        }
    }

    /// Human-readable label for section headings.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Corretiva => "Corretiva",
            Classification::Preventiva => "Preventiva",
            Classification::ContencaoVegetal => "Contenção Vegetal",
            Classification::LavagemDeModulos => "Lavagem de Módulos",
            Classification::Materiais => "Materiais",
        }
    }

    /// ASCII kebab-case name accepted on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Classification::Corretiva => "corretiva",
            Classification::Preventiva => "preventiva",
            Classification::ContencaoVegetal => "contencao-vegetal",
            Classification::LavagemDeModulos => "lavagem-de-modulos",
            Classification::Materiais => "materiais",
        }
    }

    /// First classification (in priority order) whose keyword occurs
    /// anywhere in `line`.
    pub fn detect(line: &str) -> Option<Classification> {
        Self::all()
            .iter()
            .copied()
            .find(|c| line.contains(c.keyword()))
    }

    /// Resolve a user-supplied name. Accepts the CLI name, the label or the
    /// keyword, case-insensitively.
    pub fn from_name(name: &str) -> Option<Classification> {
        let wanted = name.trim().to_lowercase();
        Self::all().iter().copied().find(|c| {
            wanted == c.cli_name()
                || wanted == c.label().to_lowercase()
                || wanted == c.keyword().to_lowercase()
        })
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// Raw input
// =============================================================================

/// A spreadsheet cell after decoding, independent of the file format.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A native date-time value from a workbook cell.
    DateTime(NaiveDateTime),
    /// A cell the reader could not decode (e.g. `#N/A`).
    Error(String),
}

impl Cell {
    /// Display form used for sender values and error messages.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Error(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// A sheet as read from disk: one header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// One chat message, one per spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// `None` only when the date cell was empty. Such messages never fall
    /// inside a date range.
    pub timestamp: Option<NaiveDateTime>,

    /// Sender identifier, copied verbatim onto every record.
    pub sender: String,

    /// Message body. `None` when the cell was not textual; those rows are
    /// skipped during extraction.
    pub text: Option<String>,
}

// =============================================================================
// Parsed output
// =============================================================================

/// One `equipment[description]` line extracted from a message, stamped with
/// the classification and equipment type in effect at that line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    pub classification: Option<Classification>,
    pub equipment_type: Option<String>,
    pub equipment: String,
    pub description: String,
    pub sender: String,
}

// =============================================================================
// Summary
// =============================================================================

/// Statistics over a record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSummary {
    /// Number of records.
    pub total_records: usize,

    /// Distinct equipment-type values. An absent type counts as one value.
    pub distinct_equipment_types: usize,

    /// Records per classification, descending by count. Records without a
    /// classification are not counted here.
    pub by_classification: Vec<(Classification, usize)>,
}
