//! HTTP client for the query generation backend

use crate::dataset::Row;
use crate::query::SqlQuery;

use super::types::{
    GenerateQueryRequest, GenerateQueryResponse, RemoteConfig, RemoteError, SqlHelpRequest,
    SqlHelpResponse, GENERATE_QUERY_ENDPOINT, SQL_HELP_ENDPOINT,
};

/// Client for the optional query generation backend.
///
/// One client is built at startup and reused for every request; reqwest
/// pools connections internally.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    /// Builds a client from a validated configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::ClientInit {
                message: e.to_string(),
            })?;

        Ok(RemoteClient {
            client,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Asks the backend to generate a SQL query for a question.
    ///
    /// The full row set rides along so the backend can see the data shape.
    pub async fn generate_query(
        &self,
        question: &str,
        rows: &[Row],
    ) -> Result<SqlQuery, RemoteError> {
        let url = self.endpoint(GENERATE_QUERY_ENDPOINT);
        let body = GenerateQueryRequest {
            question,
            csv_data: rows,
        };

        tracing::debug!("POST {} ({} rows)", url, rows.len());

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::GenerateFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::GenerateFailed {
                message: format!("Unexpected status: {}", response.status()),
            });
        }

        let parsed: GenerateQueryResponse =
            response
                .json()
                .await
                .map_err(|e| RemoteError::GenerateFailed {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(parsed.into_query())
    }

    /// Asks the backend a free-form SQL question.
    pub async fn sql_help(&self, question: &str) -> Result<String, RemoteError> {
        let url = self.endpoint(SQL_HELP_ENDPOINT);
        let body = SqlHelpRequest { question };

        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::HelpFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::HelpFailed {
                message: format!("Unexpected status: {}", response.status()),
            });
        }

        let parsed: SqlHelpResponse =
            response.json().await.map_err(|e| RemoteError::HelpFailed {
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(parsed.into_answer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = RemoteClient::new(RemoteConfig::new("http://localhost:5000").unwrap()).unwrap();
        assert_eq!(
            client.endpoint(GENERATE_QUERY_ENDPOINT),
            "http://localhost:5000/api/generate-query"
        );
        assert_eq!(
            client.endpoint(SQL_HELP_ENDPOINT),
            "http://localhost:5000/api/sql-help"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_config() {
        let client =
            RemoteClient::new(RemoteConfig::new("http://localhost:5000/").unwrap()).unwrap();
        assert_eq!(
            client.endpoint(SQL_HELP_ENDPOINT),
            "http://localhost:5000/api/sql-help"
        );
    }
}
