//! SQL export artifacts and display formatting
//!
//! Builds the downloadable SQL files (single query, history entry, full
//! history) and the human-readable labels shown next to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::GeneratedQuery;

/// Separator line between blocks in a bulk history export
const HISTORY_BLOCK_SEPARATOR: &str = "-- ==========================================";

// ============================================================================
// Error Types
// ============================================================================

/// Typed error enum for export operations
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[serde(tag = "code", content = "details", rename_all = "camelCase")]
pub enum ExportError {
    /// Bulk export requested with an empty history
    #[error("No queries to export")]
    NoQueries,

    /// Single-query export requested but no query matches
    #[error("No query to export")]
    NoCurrentQuery,
}

// ============================================================================
// Artifact Types
// ============================================================================

/// A downloadable file: suggested name plus full text content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

// ============================================================================
// Artifact Builders
// ============================================================================

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn date_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn type_label(entry: &GeneratedQuery) -> &'static str {
    if entry.is_template {
        "Template"
    } else {
        "Generated"
    }
}

fn entry_block(heading: &str, entry: &GeneratedQuery) -> String {
    let explanation = if entry.explanation.is_empty() {
        "No explanation provided."
    } else {
        &entry.explanation
    };

    format!(
        "{}\n-- Question: {}\n-- Generated on: {}\n-- Type: {}\n\n{}\n\n-- Explanation:\n{}",
        heading,
        entry.question,
        format_timestamp(entry.created_at),
        type_label(entry),
        entry.sql,
        explanation
    )
}

/// Builds the download artifact for a freshly generated query.
pub fn query_artifact(entry: &GeneratedQuery) -> ExportArtifact {
    let content = format!(
        "-- Generated SQL Query\n-- Question: {}\n-- Generated on: {}\n\n{}\n\n-- Explanation:\n{}",
        entry.question,
        format_timestamp(entry.created_at),
        entry.sql,
        entry.explanation
    );

    ExportArtifact {
        file_name: format!("query_{}.sql", date_stamp(entry.created_at)),
        content,
    }
}

/// Builds the download artifact for one history entry.
///
/// Unlike the fresh-query artifact this carries a Type line and falls back
/// when the explanation is empty.
pub fn history_entry_artifact(entry: &GeneratedQuery) -> ExportArtifact {
    ExportArtifact {
        file_name: format!("query_{}.sql", date_stamp(entry.created_at)),
        content: entry_block("-- Generated SQL Query", entry),
    }
}

/// Builds the bulk export artifact covering the whole history.
///
/// Each entry becomes a numbered block closed by a separator line; blocks
/// are joined by a blank line. An empty history is an error.
pub fn history_artifact(
    history: &[GeneratedQuery],
    exported_at: DateTime<Utc>,
) -> Result<ExportArtifact, ExportError> {
    if history.is_empty() {
        return Err(ExportError::NoQueries);
    }

    let content = history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "{}\n\n{}\n",
                entry_block(&format!("-- Query {}", index + 1), entry),
                HISTORY_BLOCK_SEPARATOR
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ExportArtifact {
        file_name: format!("querify_history_{}.sql", date_stamp(exported_at)),
        content,
    })
}

// ============================================================================
// Display Helpers
// ============================================================================

/// Renders a timestamp as a relative age label.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minutes ago", minutes)
    } else if minutes < 1440 {
        format!("{} hours ago", minutes / 60)
    } else {
        format!("{} days ago", minutes / 1440)
    }
}

/// Renders a byte count with base-1024 units, at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", rendered, UNITS[exponent])
}
