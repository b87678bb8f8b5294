//! Remote backend configuration and wire types
//!
//! The remote backend is optional: when no base URL is configured, every
//! query is answered by the local rule table instead.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::dataset::Row;
use crate::query::SqlQuery;

/// Request timeout applied to every backend call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the query generation endpoint
pub const GENERATE_QUERY_ENDPOINT: &str = "/api/generate-query";

/// Path of the SQL help endpoint
pub const SQL_HELP_ENDPOINT: &str = "/api/sql-help";

// ============================================================================
// Error Types
// ============================================================================

/// Typed error enum for remote backend operations.
///
/// Display strings are the single user-visible messages; detail fields ride
/// along for diagnostics.
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[serde(tag = "code", content = "details", rename_all = "camelCase")]
pub enum RemoteError {
    /// The configured base URL is not a valid http(s) URL
    #[error("Invalid API base URL: {message}")]
    InvalidBaseUrl { message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {message}")]
    ClientInit { message: String },

    /// The generation endpoint failed or returned an unusable response
    #[error("Failed to generate query. Please try again.")]
    GenerateFailed { message: String },

    /// The help endpoint failed or returned an unusable response
    #[error("Failed to get SQL help. Please try again.")]
    HelpFailed { message: String },
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for the query generation backend
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL with any trailing slash removed
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Validates and normalizes a base URL.
    ///
    /// Only http and https URLs are accepted; a trailing slash is stripped so
    /// endpoint paths can be appended directly.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let parsed = Url::parse(base_url).map_err(|e| RemoteError::InvalidBaseUrl {
            message: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RemoteError::InvalidBaseUrl {
                message: format!("unsupported scheme: {}", parsed.scheme()),
            });
        }

        Ok(RemoteConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Body sent to the query generation endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQueryRequest<'a> {
    pub question: &'a str,
    pub csv_data: &'a [Row],
}

/// Body returned by the query generation endpoint.
///
/// Both fields are optional; missing or empty values fall back to a safe
/// default so a sparse backend response still yields a usable query.
#[derive(Debug, Deserialize)]
pub struct GenerateQueryResponse {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl GenerateQueryResponse {
    /// Converts the response into a query, applying fallbacks.
    pub fn into_query(self) -> SqlQuery {
        SqlQuery {
            sql: self
                .sql
                .filter(|sql| !sql.is_empty())
                .unwrap_or_else(|| "SELECT * FROM data;".to_string()),
            explanation: self
                .explanation
                .filter(|explanation| !explanation.is_empty())
                .unwrap_or_else(|| "Query generated successfully.".to_string()),
        }
    }
}

/// Body sent to the SQL help endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlHelpRequest<'a> {
    pub question: &'a str,
}

/// Body returned by the SQL help endpoint
#[derive(Debug, Deserialize)]
pub struct SqlHelpResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl SqlHelpResponse {
    /// Extracts the answer, applying the fallback.
    pub fn into_answer(self) -> String {
        self.answer
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| "No answer available.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;

    #[test]
    fn test_config_accepts_http_and_https() {
        assert!(RemoteConfig::new("http://localhost:5000").is_ok());
        assert!(RemoteConfig::new("https://api.example.com").is_ok());
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = RemoteConfig::new("http://localhost:5000/").unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_config_default_timeout() {
        let config = RemoteConfig::new("http://localhost:5000").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_rejects_invalid_url() {
        assert!(matches!(
            RemoteConfig::new("not a url"),
            Err(RemoteError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_config_rejects_non_http_scheme() {
        assert!(matches!(
            RemoteConfig::new("ftp://example.com"),
            Err(RemoteError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_generate_request_serializes_camel_case() {
        let mut row = Row::new();
        row.insert("name".to_string(), CellValue::Text("Alice".to_string()));
        row.insert("age".to_string(), CellValue::Number(30.0));
        let rows = vec![row];

        let request = GenerateQueryRequest {
            question: "How many rows are there?",
            csv_data: &rows,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "How many rows are there?");
        assert_eq!(json["csvData"][0]["name"], "Alice");
        assert_eq!(json["csvData"][0]["age"], 30.0);
    }

    #[test]
    fn test_generate_response_uses_values_when_present() {
        let response: GenerateQueryResponse = serde_json::from_str(
            "{\"sql\": \"SELECT name FROM data;\", \"explanation\": \"Selects names.\"}",
        )
        .unwrap();

        let query = response.into_query();
        assert_eq!(query.sql, "SELECT name FROM data;");
        assert_eq!(query.explanation, "Selects names.");
    }

    #[test]
    fn test_generate_response_falls_back_when_missing() {
        let response: GenerateQueryResponse = serde_json::from_str("{}").unwrap();

        let query = response.into_query();
        assert_eq!(query.sql, "SELECT * FROM data;");
        assert_eq!(query.explanation, "Query generated successfully.");
    }

    #[test]
    fn test_generate_response_falls_back_when_empty() {
        let response: GenerateQueryResponse =
            serde_json::from_str("{\"sql\": \"\", \"explanation\": \"\"}").unwrap();

        let query = response.into_query();
        assert_eq!(query.sql, "SELECT * FROM data;");
        assert_eq!(query.explanation, "Query generated successfully.");
    }

    #[test]
    fn test_help_response_fallback() {
        let missing: SqlHelpResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.into_answer(), "No answer available.");

        let present: SqlHelpResponse =
            serde_json::from_str("{\"answer\": \"Use INNER JOIN.\"}").unwrap();
        assert_eq!(present.into_answer(), "Use INNER JOIN.");
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let generate = RemoteError::GenerateFailed {
            message: "timeout".to_string(),
        };
        assert_eq!(
            generate.to_string(),
            "Failed to generate query. Please try again."
        );

        let help = RemoteError::HelpFailed {
            message: "timeout".to_string(),
        };
        assert_eq!(help.to_string(), "Failed to get SQL help. Please try again.");
    }
}
