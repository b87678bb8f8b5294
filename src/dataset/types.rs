//! Core type definitions for the dataset module
//!
//! Contains the in-memory table produced by CSV ingestion, the statistics
//! derived from it, and the preview/profile shapes returned to clients.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of rows returned by a preview request
pub const PREVIEW_ROW_LIMIT: usize = 100;

/// Number of columns shown by default before the client asks for all of them
pub const PREVIEW_COLUMN_LIMIT: usize = 8;

// ============================================================================
// Core Data Types
// ============================================================================

/// A single cell: either a number or verbatim text.
///
/// Inference happens per cell at ingestion time; serialization is untagged so
/// the wire shape is a plain JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell (full-field numeric literal)
    Number(f64),
    /// Text cell (trimmed, quote-stripped field content)
    Text(String),
}

impl CellValue {
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single data row, keyed by column name
pub type Row = BTreeMap<String, CellValue>;

/// In-memory table produced by ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Raw header fields in input order; duplicates are kept as-is
    pub columns: Vec<String>,
    /// Data rows, one per non-blank input line
    pub rows: Vec<Row>,
}

impl Table {
    /// Column names with duplicates collapsed to their first occurrence.
    ///
    /// Rows are keyed maps, so a duplicated header contributes one key; every
    /// consumer that walks cells goes through this list.
    pub fn column_keys(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            if !seen.contains(&name.as_str()) {
                seen.push(name.as_str());
            }
        }
        seen
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Columns whose first-row cell is numeric, in column order
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    /// Columns whose first-row cell is text, in column order
    pub fn text_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Text)
    }

    /// Type label for one column, judged from the first row
    pub fn column_kind(&self, name: &str) -> ColumnKind {
        match self.first_row().and_then(|row| row.get(name)) {
            Some(CellValue::Number(_)) => ColumnKind::Numeric,
            _ => ColumnKind::Text,
        }
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        match self.first_row() {
            Some(_) => self
                .column_keys()
                .into_iter()
                .filter(|name| self.column_kind(name) == kind)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Type label for a column, judged from the first row's cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Dataset-level statistics, recomputed whenever the table changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    /// Number of data rows
    pub rows: usize,
    /// Number of distinct column names
    pub columns: usize,
    /// Byte size of the uploaded source
    pub file_size: u64,
    /// Columns whose first-row cell is numeric
    pub numeric_columns: usize,
    /// Columns whose first-row cell is text
    pub text_columns: usize,
}

/// Per-column analysis for the stats view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Column name
    pub name: String,
    /// Type label from the first row
    pub kind: ColumnKind,
    /// Detailed figures; absent when a numeric column holds no numeric cells
    pub stats: Option<ProfileStats>,
}

/// Detailed figures for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProfileStats {
    /// Numeric column: aggregates over the cells that are numbers
    #[serde(rename_all = "camelCase")]
    Numeric {
        min: f64,
        max: f64,
        avg: f64,
        sum: f64,
        count: usize,
    },
    /// Text column: value diversity over every cell
    #[serde(rename_all = "camelCase")]
    Text {
        unique_count: usize,
        total_count: usize,
        most_common: Option<String>,
    },
}

// ============================================================================
// Preview Types
// ============================================================================

/// One visible column in a preview page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// A filtered, sorted, capped view over the current table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPage {
    /// Visible columns (first eight unless all were requested)
    pub columns: Vec<PreviewColumn>,
    /// Matching rows, projected onto the visible columns, at most 100
    pub rows: Vec<Row>,
    /// Rows matching the search before the cap
    pub matched_rows: usize,
    /// Rows in the whole table
    pub total_rows: usize,
    /// Distinct columns in the whole table
    pub total_columns: usize,
}

/// Sort direction for previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Typed error enum for dataset operations.
///
/// Display strings are the single user-visible messages; detail fields ride
/// along for diagnostics.
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[serde(tag = "code", content = "details", rename_all = "camelCase")]
pub enum DatasetError {
    /// Uploaded file does not have a .csv extension
    #[error("Please upload a CSV file")]
    InvalidFileType { name: String },

    /// Failed to read the source file
    #[error("Error reading file")]
    ReadError { message: String },

    /// Failed to parse the CSV content
    #[error("Error parsing CSV file. Please check the file format.")]
    ParseError { message: String },

    /// An operation needed a table but none is loaded
    #[error("Please upload a CSV file first")]
    NoData,
}
