//! Dataset processing logic
//!
//! Handles CSV ingestion, per-cell type inference, dataset statistics,
//! column profiles, and the preview view.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::dataset::types::{
    CellValue, ColumnKind, ColumnProfile, DatasetError, DatasetStats, PreviewColumn, PreviewPage,
    ProfileStats, Row, SortDirection, Table, PREVIEW_COLUMN_LIMIT, PREVIEW_ROW_LIMIT,
};

/// Read a CSV file from disk and parse it.
///
/// # Arguments
/// * `path` - Path to the CSV file (must carry a .csv extension)
///
/// # Returns
/// * The parsed `Table` plus the byte size of the content
pub async fn read_csv(path: &Path) -> Result<(Table, u64), DatasetError> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    validate_file_name(name)?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DatasetError::ReadError {
            message: format!("failed to read '{}': {}", path.display(), e),
        })?;

    let size = content.len() as u64;
    let table = parse_csv_content(&content)?;
    Ok((table, size))
}

/// Check that an uploaded file name carries a .csv extension (any case)
pub fn validate_file_name(name: &str) -> Result<(), DatasetError> {
    if name.to_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(DatasetError::InvalidFileType {
            name: name.to_string(),
        })
    }
}

/// Parse CSV content from a string.
///
/// # Behavior
/// - Splits on newlines; the first line's comma-separated, quote-stripped
///   fields become the column names (duplicates kept)
/// - Data lines are split on commas with no quoted-field handling; a comma
///   inside quotes splits the field (a known limitation of the format this
///   tool accepts, kept deliberately)
/// - Each field is trimmed, stripped of double quotes, and stored as a
///   number when the whole field is a finite numeric literal
/// - Blank lines are dropped; short rows are padded with empty text and
///   extra fields beyond the column count are discarded
pub fn parse_csv_content(content: &str) -> Result<Table, DatasetError> {
    if content.trim().is_empty() {
        return Err(DatasetError::ParseError {
            message: "file is empty".to_string(),
        });
    }

    let mut lines = content.split('\n');
    let header_line = lines.next().unwrap_or("");
    let columns: Vec<String> = header_line.split(',').map(clean_field).collect();

    let rows: Vec<Row> = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(line, &columns))
        .collect();

    tracing::debug!(
        "parsed CSV content: {} columns, {} rows",
        columns.len(),
        rows.len()
    );

    Ok(Table { columns, rows })
}

/// Infer a single cell value from a cleaned field.
///
/// The whole field must parse as a finite numeric literal to become a
/// number; anything else stays text verbatim.
pub fn infer_cell(value: &str) -> CellValue {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(value.to_string()),
    }
}

/// Trim a raw field and remove every double-quote character
fn clean_field(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '"').collect()
}

fn parse_row(line: &str, columns: &[String]) -> Row {
    let values: Vec<String> = line.split(',').map(clean_field).collect();

    let mut row = Row::new();
    for (index, name) in columns.iter().enumerate() {
        let cell = match values.get(index) {
            Some(value) => infer_cell(value),
            None => CellValue::Text(String::new()),
        };
        row.insert(name.clone(), cell);
    }
    row
}

// ============================================================================
// Statistics
// ============================================================================

/// Dataset-level statistics for the current table.
///
/// Column counts are judged from the first row; a table with no data rows
/// reports zero columns, matching what the preview shows for it.
pub fn compute_stats(table: &Table, file_size: u64) -> DatasetStats {
    match table.first_row() {
        Some(_) => DatasetStats {
            rows: table.rows.len(),
            columns: table.column_keys().len(),
            file_size,
            numeric_columns: table.numeric_columns().len(),
            text_columns: table.text_columns().len(),
        },
        None => DatasetStats {
            file_size,
            ..DatasetStats::default()
        },
    }
}

/// Per-column analysis for the stats view.
///
/// Numeric columns aggregate over the cells that are numbers; text columns
/// report value diversity over every cell. Mixed columns follow the first
/// row's type.
pub fn column_profiles(table: &Table) -> Vec<ColumnProfile> {
    if table.rows.is_empty() {
        return Vec::new();
    }

    let mut profiles = Vec::new();
    for key in table.column_keys() {
        let cells: Vec<&CellValue> = table.rows.iter().filter_map(|row| row.get(key)).collect();
        let kind = table.column_kind(key);

        let stats = match kind {
            ColumnKind::Numeric => {
                let numbers: Vec<f64> = cells.iter().filter_map(|c| c.as_number()).collect();
                if numbers.is_empty() {
                    None
                } else {
                    let sum: f64 = numbers.iter().sum();
                    let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
                    let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    Some(ProfileStats::Numeric {
                        min,
                        max,
                        avg: sum / numbers.len() as f64,
                        sum,
                        count: numbers.len(),
                    })
                }
            }
            ColumnKind::Text => {
                let rendered: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                // Uniqueness distinguishes a numeric 1 from a text "1";
                // occurrence counts do not.
                let unique: HashSet<(bool, &str)> = cells
                    .iter()
                    .zip(rendered.iter())
                    .map(|(cell, text)| (cell.is_number(), text.as_str()))
                    .collect();
                Some(ProfileStats::Text {
                    unique_count: unique.len(),
                    total_count: rendered.len(),
                    most_common: most_common(&rendered),
                })
            }
        };

        profiles.push(ColumnProfile {
            name: key.to_string(),
            kind,
            stats,
        });
    }
    profiles
}

/// Most frequent rendered value; ties go to the value seen first
fn most_common(values: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        let entry = counts.entry(value.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(value.as_str());
        }
        *entry += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in order {
        let count = counts[name];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

// ============================================================================
// Preview
// ============================================================================

/// Build a filtered, sorted, capped view over the table.
///
/// # Arguments
/// * `search` - case-insensitive substring matched against every cell
/// * `sort_by` - column to sort by; unknown columns leave the order as-is
/// * `sort_dir` - ascending or descending
/// * `all_columns` - show every column instead of the first eight
pub fn preview(
    table: &Table,
    search: Option<&str>,
    sort_by: Option<&str>,
    sort_dir: SortDirection,
    all_columns: bool,
) -> PreviewPage {
    let keys = table.column_keys();
    let visible: Vec<&str> = if all_columns {
        keys.clone()
    } else {
        keys.iter().take(PREVIEW_COLUMN_LIMIT).copied().collect()
    };

    let term = search
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty());
    let mut matched: Vec<&Row> = table
        .rows
        .iter()
        .filter(|row| match &term {
            Some(t) => row
                .values()
                .any(|cell| cell.to_string().to_lowercase().contains(t.as_str())),
            None => true,
        })
        .collect();

    if let Some(key) = sort_by {
        if keys.contains(&key) {
            matched.sort_by(|a, b| {
                let ord = compare_cells(a.get(key), b.get(key));
                match sort_dir {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
    }

    let matched_rows = matched.len();
    let rows: Vec<Row> = matched
        .into_iter()
        .take(PREVIEW_ROW_LIMIT)
        .map(|row| {
            visible
                .iter()
                .filter_map(|name| {
                    row.get(*name)
                        .map(|cell| ((*name).to_string(), cell.clone()))
                })
                .collect()
        })
        .collect();

    PreviewPage {
        columns: visible
            .iter()
            .map(|name| PreviewColumn {
                name: (*name).to_string(),
                kind: table.column_kind(name),
            })
            .collect(),
        rows,
        matched_rows,
        total_rows: table.rows.len(),
        total_columns: keys.len(),
    }
}

/// Numeric when both cells are numbers, lower-cased text comparison otherwise
fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    match (a, b) {
        (Some(CellValue::Number(x)), Some(CellValue::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x
            .to_string()
            .to_lowercase()
            .cmp(&y.to_string().to_lowercase()),
        _ => Ordering::Equal,
    }
}
