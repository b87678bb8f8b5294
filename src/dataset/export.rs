//! CSV export for the current table
//!
//! Rebuilds CSV text from the in-memory table: an unquoted header line, then
//! one line per row with every field wrapped in double quotes.

use crate::dataset::types::Table;

/// Suggested file name for the CSV download artifact
pub const CSV_EXPORT_FILE_NAME: &str = "data_preview.csv";

/// Render the whole table as CSV text
pub fn table_to_csv(table: &Table) -> String {
    let keys = table.column_keys();

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(keys.join(","));

    for row in &table.rows {
        let fields: Vec<String> = keys
            .iter()
            .map(|name| match row.get(*name) {
                Some(cell) => format!("\"{}\"", cell),
                None => "\"\"".to_string(),
            })
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}
