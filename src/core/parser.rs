// SolarMaint - core/parser.rs
//
// Line scanner that turns one free-text maintenance message into records.
// Core layer: accepts &str, never touches the filesystem.
//
// Per-message state is two values: the classification announced by the most
// recent keyword line, and the equipment type announced by the most recent
// dash-prefixed header. Both live inside `Records` and start unset for every
// message.

use crate::core::model::{Classification, ParsedRecord};
use crate::util::constants::DEBUG_MAX_LINE_PREVIEW;

/// Marker that opens a subsection (equipment type) header line.
const SUBSECTION_MARKER: char = '-';

/// Characters stripped from a header line to produce its label.
const SUBSECTION_STRIP: [char; 2] = ['-', ':'];

/// Why a bracket line could not be split into equipment and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketError {
    /// The line has no `[`.
    MissingOpen,
}

/// Split `equipment[description]` at the first `[` and the first `]` after it.
///
/// Both halves are trimmed. Text after the closing bracket is ignored. When
/// no `]` follows the first `[`, the description runs to the end of the line,
/// so `"Mesa ] 13 [ x"` gives `("Mesa ] 13", "x")`.
pub fn split_bracket(line: &str) -> Result<(&str, &str), BracketError> {
    let open = line.find('[').ok_or(BracketError::MissingOpen)?;
    let rest = &line[open + 1..];
    let close = rest.find(']').unwrap_or(rest.len());
    Ok((line[..open].trim(), rest[..close].trim()))
}

/// Label of a dash-prefixed header line: every `-` and `:` removed, then
/// trimmed. `"- Inversores:"` becomes `"Inversores"`.
pub fn subsection_label(line: &str) -> String {
    line.chars()
        .filter(|c| !SUBSECTION_STRIP.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lazy, ordered sequence of records extracted from one message.
///
/// Created by [`records`]. Each call to `next` advances through lines until
/// one yields a record.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    lines: std::str::Split<'a, char>,
    sender: &'a str,
    classification: Option<Classification>,
    equipment_type: Option<String>,
}

impl<'a> Records<'a> {
    fn new(text: &'a str, sender: &'a str) -> Self {
        Self {
            lines: text.split('\n'),
            sender,
            classification: None,
            equipment_type: None,
        }
    }

    /// Apply one line to the running state, returning a record if the line
    /// is a well-formed bracket line.
    fn scan_line(&mut self, raw: &str) -> Option<ParsedRecord> {
        let line = raw.trim();

        // A keyword line updates the classification and still goes on to
        // the header and bracket checks below.
        if let Some(found) = Classification::detect(line) {
            self.classification = Some(found);
        }

        if line.starts_with(SUBSECTION_MARKER) {
            self.equipment_type = Some(subsection_label(line));
            return None;
        }

        if !(line.contains('[') && line.contains(']')) {
            return None;
        }

        match split_bracket(line) {
            Ok((equipment, description)) => Some(ParsedRecord {
                classification: self.classification,
                equipment_type: self.equipment_type.clone(),
                equipment: equipment.to_string(),
                description: description.to_string(),
                sender: self.sender.to_string(),
            }),
            Err(reason) => {
                tracing::trace!(
                    ?reason,
                    line = %preview(line),
                    "Skipping malformed bracket line"
                );
                None
            }
        }
    }
}

impl Iterator for Records<'_> {
    type Item = ParsedRecord;

    fn next(&mut self) -> Option<ParsedRecord> {
        while let Some(line) = self.lines.next() {
            if let Some(record) = self.scan_line(line) {
                return Some(record);
            }
        }
        None
    }
}

/// Lazily extract records from one message body.
pub fn records<'a>(text: &'a str, sender: &'a str) -> Records<'a> {
    Records::new(text, sender)
}

/// Extract all records from one message body, in line order.
pub fn parse_message(text: &str, sender: &str) -> Vec<ParsedRecord> {
    records(text, sender).collect()
}

/// Shorten a line for log output without splitting a UTF-8 sequence.
fn preview(line: &str) -> String {
    if line.chars().count() <= DEBUG_MAX_LINE_PREVIEW {
        line.to_string()
    } else {
        let mut s: String = line.chars().take(DEBUG_MAX_LINE_PREVIEW).collect();
        s.push('…');
        s
    }
}
