//! Rendering collected diagnostics for terminals and machines.

use crate::diagnostic::DiagnosticRecord;
use anyhow::{Context as _, Result};

/// One indented line per record: position, message and rule name.
/// `color` selects the ANSI-styled message.
pub fn render(records: &[DiagnosticRecord], color: bool) -> String {
    records
        .iter()
        .map(|record| {
            let message = if color {
                &record.color_message
            } else {
                &record.message
            };
            format!(
                "    line {}, col {}: {} ({})\n",
                record.line, record.col, message, record.rule_name
            )
        })
        .collect()
}

/// Pretty JSON array of records with `camelCase` keys.
///
/// # Errors
///
/// Fails only if `serde_json` cannot serialize a record.
pub fn to_json(records: &[DiagnosticRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize diagnostics")
}
