//! Rule-based SQL synthesis
//!
//! Matches a free-text question against an ordered list of keyword triggers
//! and fills a canned SQL template with column names discovered at runtime.
//! This path never fails: when no rule matches, or a rule's prerequisites
//! are missing, it degrades to a default query with an explanatory caveat.

use crate::dataset::types::{CellValue, Table};
use crate::query::types::SqlQuery;

type Matcher = fn(&str) -> bool;
type Handler = fn(&str, &Table) -> SqlQuery;

/// Trigger table, evaluated top to bottom; first match wins.
///
/// Order is part of the contract: a question containing both "count" and
/// "average" resolves to the count rule because it is checked first.
const RULES: &[(Matcher, Handler)] = &[
    (matches_count, count_rule),
    (matches_average, average_rule),
    (matches_sum, sum_rule),
    (matches_top, top_rule),
    (matches_bottom, bottom_rule),
    (matches_group, group_rule),
    (matches_filter, filter_rule),
    (matches_duplicates, duplicates_rule),
    (matches_unique, unique_rule),
];

/// Synthesize SQL for a question over the current table.
///
/// The question is lower-cased before trigger matching. An empty table short
/// circuits to a bare `SELECT *` with a no-data explanation.
pub fn generate(question: &str, table: &Table) -> SqlQuery {
    if table.rows.is_empty() {
        return SqlQuery {
            sql: "SELECT * FROM data;".to_string(),
            explanation: "No data available to generate query.".to_string(),
        };
    }

    let lowered = question.to_lowercase();
    for (matches, handler) in RULES {
        if matches(&lowered) {
            return handler(&lowered, table);
        }
    }
    default_rule(table)
}

// ============================================================================
// Triggers
// ============================================================================

fn matches_count(q: &str) -> bool {
    q.contains("count") || q.contains("total number")
}

fn matches_average(q: &str) -> bool {
    q.contains("average") || q.contains("mean")
}

fn matches_sum(q: &str) -> bool {
    q.contains("sum") || q.contains("total")
}

fn matches_top(q: &str) -> bool {
    q.contains("top") || q.contains("highest")
}

fn matches_bottom(q: &str) -> bool {
    q.contains("bottom") || q.contains("lowest")
}

fn matches_group(q: &str) -> bool {
    q.contains("group") || q.contains("by")
}

fn matches_filter(q: &str) -> bool {
    q.contains("filter")
        || q.contains("where")
        || q.contains("greater than")
        || q.contains("less than")
}

fn matches_duplicates(q: &str) -> bool {
    q.contains("duplicate")
}

fn matches_unique(q: &str) -> bool {
    q.contains("unique") || q.contains("distinct")
}

// ============================================================================
// Handlers
// ============================================================================

fn count_rule(_q: &str, _table: &Table) -> SqlQuery {
    SqlQuery {
        sql: "SELECT COUNT(*) as total_count FROM data;".to_string(),
        explanation: "This query counts the total number of records in your dataset.".to_string(),
    }
}

fn average_rule(_q: &str, table: &Table) -> SqlQuery {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return first_ten_fallback("average calculation");
    }

    let selections: Vec<String> = numeric
        .iter()
        .map(|col| format!("AVG({}) as avg_{}", col, col))
        .collect();
    SqlQuery {
        sql: format!("SELECT {} FROM data;", selections.join(", ")),
        explanation: format!(
            "This query calculates the average values for all numeric columns: {}.",
            numeric.join(", ")
        ),
    }
}

fn sum_rule(_q: &str, table: &Table) -> SqlQuery {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return first_ten_fallback("sum calculation");
    }

    let selections: Vec<String> = numeric
        .iter()
        .map(|col| format!("SUM({}) as total_{}", col, col))
        .collect();
    SqlQuery {
        sql: format!("SELECT {} FROM data;", selections.join(", ")),
        explanation: format!(
            "This query calculates the sum of all numeric columns: {}.",
            numeric.join(", ")
        ),
    }
}

fn top_rule(_q: &str, table: &Table) -> SqlQuery {
    match table.numeric_columns().first() {
        Some(col) => SqlQuery {
            sql: format!("SELECT * FROM data ORDER BY {} DESC LIMIT 10;", col),
            explanation: format!(
                "This query shows the top 10 records ordered by {} in descending order.",
                col
            ),
        },
        None => first_ten_fallback("ordering"),
    }
}

fn bottom_rule(_q: &str, table: &Table) -> SqlQuery {
    match table.numeric_columns().first() {
        Some(col) => SqlQuery {
            sql: format!("SELECT * FROM data ORDER BY {} ASC LIMIT 10;", col),
            explanation: format!(
                "This query shows the bottom 10 records ordered by {} in ascending order.",
                col
            ),
        },
        None => first_ten_fallback("ordering"),
    }
}

fn group_rule(_q: &str, table: &Table) -> SqlQuery {
    // First text column whose first-row value is short enough to look
    // categorical; the first-row length stands in for the whole column.
    let group_column = table.column_keys().into_iter().find(|name| {
        match table.first_row().and_then(|row| row.get(*name)) {
            Some(CellValue::Text(value)) => value.chars().count() < 50,
            _ => false,
        }
    });

    let group = match group_column {
        Some(name) => name,
        None => {
            return SqlQuery {
                sql: "SELECT * FROM data LIMIT 10;".to_string(),
                explanation:
                    "No suitable categorical columns found for grouping. Showing first 10 records instead."
                        .to_string(),
            }
        }
    };

    match table.numeric_columns().first() {
        Some(metric) => SqlQuery {
            sql: format!(
                "SELECT {}, COUNT(*) as count, AVG({}) as avg_{} FROM data GROUP BY {} ORDER BY count DESC;",
                group, metric, metric, group
            ),
            explanation: format!(
                "This query groups the data by {} and shows the count and average of {} for each group.",
                group, metric
            ),
        },
        None => SqlQuery {
            sql: format!(
                "SELECT {}, COUNT(*) as count FROM data GROUP BY {} ORDER BY count DESC;",
                group, group
            ),
            explanation: format!(
                "This query groups the data by {} and shows the count for each group.",
                group
            ),
        },
    }
}

fn filter_rule(q: &str, table: &Table) -> SqlQuery {
    let column = match table.numeric_columns().first() {
        Some(col) => *col,
        None => return first_ten_fallback("filtering"),
    };

    // Threshold: 80% of the column's first-row value, rounded
    let sample = table
        .first_row()
        .and_then(|row| row.get(column))
        .and_then(|cell| cell.as_number())
        .unwrap_or(0.0);
    let threshold = (sample * 0.8).round() as i64;

    if q.contains("greater than") {
        SqlQuery {
            sql: format!("SELECT * FROM data WHERE {} > {};", column, threshold),
            explanation: format!(
                "This query filters records where {} is greater than {}.",
                column, threshold
            ),
        }
    } else if q.contains("less than") {
        SqlQuery {
            sql: format!("SELECT * FROM data WHERE {} < {};", column, threshold),
            explanation: format!(
                "This query filters records where {} is less than {}.",
                column, threshold
            ),
        }
    } else {
        SqlQuery {
            sql: format!("SELECT * FROM data WHERE {} > {} LIMIT 20;", column, threshold),
            explanation: format!(
                "This query filters records where {} is greater than {}.",
                column, threshold
            ),
        }
    }
}

fn duplicates_rule(_q: &str, table: &Table) -> SqlQuery {
    SqlQuery {
        sql: format!(
            "SELECT *, COUNT(*) as duplicate_count FROM data GROUP BY {} HAVING COUNT(*) > 1;",
            table.column_keys().join(", ")
        ),
        explanation:
            "This query finds duplicate records by grouping on all columns and showing records that appear more than once."
                .to_string(),
    }
}

fn unique_rule(_q: &str, _table: &Table) -> SqlQuery {
    SqlQuery {
        sql: "SELECT DISTINCT * FROM data;".to_string(),
        explanation: "This query returns only unique records from your dataset.".to_string(),
    }
}

fn default_rule(_table: &Table) -> SqlQuery {
    SqlQuery {
        sql: "SELECT * FROM data LIMIT 20;".to_string(),
        explanation:
            "This query shows the first 20 records from your dataset. You can modify it based on your specific needs."
                .to_string(),
    }
}

fn first_ten_fallback(purpose: &str) -> SqlQuery {
    SqlQuery {
        sql: "SELECT * FROM data LIMIT 10;".to_string(),
        explanation: format!(
            "No numeric columns found for {}. Showing first 10 records instead.",
            purpose
        ),
    }
}
