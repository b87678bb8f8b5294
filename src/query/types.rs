//! Type definitions for query generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suggested questions surfaced to clients alongside the app state
pub const SAMPLE_QUESTIONS: [&str; 8] = [
    "Show me all records with values greater than 100",
    "Count the total number of records",
    "Find the average value for numeric columns",
    "Show the top 10 records sorted by a specific column",
    "Find duplicate entries in the data",
    "Filter records by date range",
    "Group data by a specific column and show counts",
    "Calculate the sum of all numeric columns",
];

/// A synthesized SQL statement with its plain-language explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlQuery {
    pub sql: String,
    pub explanation: String,
}

/// One generated query as recorded in history.
///
/// Entries are append-only: once created they are never mutated, only
/// listed, exported, and persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuery {
    /// The question as the user asked it
    pub question: String,
    /// The SQL produced for it
    pub sql: String,
    /// Plain-language explanation of what the SQL does
    pub explanation: String,
    /// Creation time (UTC)
    pub created_at: DateTime<Utc>,
    /// True when the local rule table produced the query, false when the
    /// remote backend did
    pub is_template: bool,
}

impl GeneratedQuery {
    pub fn new(question: &str, query: SqlQuery, is_template: bool) -> Self {
        Self {
            question: question.to_string(),
            sql: query.sql,
            explanation: query.explanation,
            created_at: Utc::now(),
            is_template,
        }
    }
}

/// Answer to a SQL help question; shown once, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpAnswer {
    pub question: String,
    pub answer: String,
}
