//! Command handlers behind the JSON-RPC surface
//!
//! Each handler parses its typed params, runs the operation against shared
//! state, and returns a JSON result. Error Display strings are the
//! user-visible messages.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::app_state::{AppState, Transition};
use crate::dataset::{self, processor, ColumnProfile, DatasetError, DatasetStats, SortDirection};
use crate::export::{self, ExportError};
use crate::query::{help, synthesizer, GeneratedQuery, HelpAnswer, SAMPLE_QUESTIONS};
use crate::remote::RemoteClient;
use crate::settings::SettingsUpdate;

use super::protocol::{InitializeResult, ServerInfo, PROTOCOL_VERSION, SERVER_NAME};

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadParams {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_dir: SortDirection,
    #[serde(default)]
    pub all_columns: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionParams {
    pub question: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExportParams {
    #[serde(default)]
    pub index: Option<usize>,
}

/// History filter matching the original all/templates/generated selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryFilter {
    All,
    Templates,
    Generated,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        HistoryFilter::All
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub filter: HistoryFilter,
}

// ============================================================================
// Result Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub message: String,
    pub stats: DatasetStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub stats: DatasetStats,
    /// Human-readable rendering of stats.fileSize
    pub file_size_label: String,
    pub profiles: Vec<ColumnProfile>,
}

/// One history entry plus its relative-age label
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    #[serde(flatten)]
    pub entry: GeneratedQuery,
    pub time_ago: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListResult {
    pub entries: Vec<HistoryEntryView>,
    /// Full history length before search and filter
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub has_data: bool,
    pub stats: DatasetStats,
    pub is_loading: bool,
    pub error: Option<String>,
    pub history_length: usize,
    pub sample_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResult {
    pub ok: bool,
}

// ============================================================================
// Parameter Helpers
// ============================================================================

fn require_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| anyhow!("Invalid params: {}", e))
}

fn optional_params<T: DeserializeOwned + Default>(params: Value) -> Result<T> {
    if params.is_null() {
        Ok(T::default())
    } else {
        require_params(params)
    }
}

// ============================================================================
// Command Context
// ============================================================================

/// Shared state and collaborators every handler works against
pub struct CommandContext {
    state: Arc<AppState>,
    remote: Option<RemoteClient>,
}

impl CommandContext {
    pub fn new(state: Arc<AppState>, remote: Option<RemoteClient>) -> Self {
        CommandContext { state, remote }
    }

    // ========================================================================
    // Session Commands
    // ========================================================================

    pub async fn initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            remote_backend: self.remote.is_some(),
        };

        Ok(serde_json::to_value(result)?)
    }

    pub async fn state_get(&self) -> Result<Value> {
        let snapshot = self.state.snapshot().await;

        let result = StateSummary {
            has_data: snapshot.table.is_some(),
            stats: snapshot.stats,
            is_loading: snapshot.is_loading,
            error: snapshot.error,
            history_length: snapshot.history.len(),
            sample_questions: SAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        };

        Ok(serde_json::to_value(result)?)
    }

    pub async fn state_clear_error(&self) -> Result<Value> {
        self.state.dispatch(Transition::ClearError).await?;
        Ok(serde_json::to_value(AckResult { ok: true })?)
    }

    // ========================================================================
    // Dataset Commands
    // ========================================================================

    pub async fn dataset_upload(&self, params: Value) -> Result<Value> {
        let params: UploadParams = require_params(params)?;

        processor::validate_file_name(&params.file_name)?;

        let file_size = params.content.len() as u64;
        let table = match processor::parse_csv_content(&params.content) {
            Ok(table) => table,
            Err(e) => {
                self.state
                    .dispatch(Transition::SetError(e.to_string()))
                    .await?;
                return Err(e.into());
            }
        };

        self.finish_ingest(&params.file_name, table, file_size).await
    }

    pub async fn dataset_load(&self, params: Value) -> Result<Value> {
        let params: LoadParams = require_params(params)?;

        let path = PathBuf::from(&params.path);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| params.path.clone());

        let (table, file_size) = match processor::read_csv(&path).await {
            Ok(loaded) => loaded,
            Err(e) => {
                // An invalid extension is rejected up front and never recorded
                if !matches!(e, DatasetError::InvalidFileType { .. }) {
                    self.state
                        .dispatch(Transition::SetError(e.to_string()))
                        .await?;
                }
                return Err(e.into());
            }
        };

        self.finish_ingest(&file_name, table, file_size).await
    }

    async fn finish_ingest(
        &self,
        file_name: &str,
        table: dataset::Table,
        file_size: u64,
    ) -> Result<Value> {
        let row_count = table.rows.len();

        self.state
            .dispatch(Transition::SetTable { table, file_size })
            .await?;

        let result = UploadResult {
            message: format!(
                "Successfully uploaded {} with {} rows",
                file_name, row_count
            ),
            stats: self.state.snapshot().await.stats,
        };

        tracing::info!("ingested {} ({} rows)", file_name, row_count);

        Ok(serde_json::to_value(result)?)
    }

    pub async fn dataset_preview(&self, params: Value) -> Result<Value> {
        let params: PreviewParams = optional_params(params)?;
        let table = self.state.require_table().await?;

        let page = processor::preview(
            &table,
            params.search.as_deref(),
            params.sort_by.as_deref(),
            params.sort_dir,
            params.all_columns,
        );

        Ok(serde_json::to_value(page)?)
    }

    pub async fn dataset_stats(&self) -> Result<Value> {
        let snapshot = self.state.snapshot().await;
        let table = snapshot.table.as_ref().ok_or(DatasetError::NoData)?;

        let result = StatsResult {
            file_size_label: export::format_file_size(snapshot.stats.file_size),
            profiles: processor::column_profiles(table),
            stats: snapshot.stats.clone(),
        };

        Ok(serde_json::to_value(result)?)
    }

    pub async fn dataset_export(&self) -> Result<Value> {
        let table = self.state.require_table().await?;

        let artifact = export::ExportArtifact {
            file_name: dataset::export::CSV_EXPORT_FILE_NAME.to_string(),
            content: dataset::export::table_to_csv(&table),
        };

        Ok(serde_json::to_value(artifact)?)
    }

    pub async fn dataset_clear(&self) -> Result<Value> {
        self.state.dispatch(Transition::ClearTable).await?;
        Ok(serde_json::to_value(AckResult { ok: true })?)
    }

    // ========================================================================
    // Query Commands
    // ========================================================================

    pub async fn query_generate(&self, params: Value) -> Result<Value> {
        let params: QuestionParams = require_params(params)?;

        if params.question.trim().is_empty() {
            return Err(anyhow!("Please enter a question"));
        }

        let table = self.state.require_table().await?;

        self.state.dispatch(Transition::SetLoading(true)).await?;

        let (query, is_template) = match &self.remote {
            Some(remote) => match remote.generate_query(&params.question, &table.rows).await {
                Ok(query) => (query, false),
                Err(e) => {
                    self.state
                        .dispatch(Transition::SetError(e.to_string()))
                        .await?;
                    self.state.dispatch(Transition::SetLoading(false)).await?;
                    return Err(e.into());
                }
            },
            None => (synthesizer::generate(&params.question, &table), true),
        };

        let entry = GeneratedQuery::new(&params.question, query, is_template);

        if let Err(e) = self
            .state
            .dispatch(Transition::AddHistoryEntry(entry.clone()))
            .await
        {
            self.state
                .dispatch(Transition::SetError(e.to_string()))
                .await?;
            self.state.dispatch(Transition::SetLoading(false)).await?;
            return Err(e.into());
        }
        self.state
            .dispatch(Transition::SetCurrentQuery(Some(entry.clone())))
            .await?;
        self.state.dispatch(Transition::SetLoading(false)).await?;

        Ok(serde_json::to_value(entry)?)
    }

    pub async fn query_help(&self, params: Value) -> Result<Value> {
        let params: QuestionParams = require_params(params)?;

        if params.question.trim().is_empty() {
            return Err(anyhow!("Please enter a SQL question"));
        }

        self.state.dispatch(Transition::SetLoading(true)).await?;

        let answer = match &self.remote {
            Some(remote) => match remote.sql_help(&params.question).await {
                Ok(answer) => answer,
                Err(e) => {
                    self.state
                        .dispatch(Transition::SetError(e.to_string()))
                        .await?;
                    self.state.dispatch(Transition::SetLoading(false)).await?;
                    return Err(e.into());
                }
            },
            None => help::answer(&params.question),
        };

        self.state.dispatch(Transition::SetLoading(false)).await?;

        let result = HelpAnswer {
            question: params.question,
            answer,
        };

        Ok(serde_json::to_value(result)?)
    }

    pub async fn query_export(&self, params: Value) -> Result<Value> {
        let params: QueryExportParams = optional_params(params)?;
        let snapshot = self.state.snapshot().await;

        let artifact = match params.index {
            Some(index) => {
                let entry = snapshot
                    .history
                    .get(index)
                    .ok_or(ExportError::NoCurrentQuery)?;
                export::history_entry_artifact(entry)
            }
            None => {
                let entry = snapshot
                    .current_query
                    .as_ref()
                    .ok_or(ExportError::NoCurrentQuery)?;
                export::query_artifact(entry)
            }
        };

        Ok(serde_json::to_value(artifact)?)
    }

    // ========================================================================
    // History Commands
    // ========================================================================

    pub async fn history_list(&self, params: Value) -> Result<Value> {
        let params: HistoryListParams = optional_params(params)?;
        let snapshot = self.state.snapshot().await;
        let now = Utc::now();

        let term = params
            .search
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let entries: Vec<HistoryEntryView> = snapshot
            .history
            .iter()
            .filter(|entry| match params.filter {
                HistoryFilter::All => true,
                HistoryFilter::Templates => entry.is_template,
                HistoryFilter::Generated => !entry.is_template,
            })
            .filter(|entry| {
                term.is_empty()
                    || entry.question.to_lowercase().contains(&term)
                    || entry.sql.to_lowercase().contains(&term)
            })
            .cloned()
            .map(|entry| HistoryEntryView {
                time_ago: export::time_ago(entry.created_at, now),
                entry,
            })
            .collect();

        let result = HistoryListResult {
            entries,
            total: snapshot.history.len(),
        };

        Ok(serde_json::to_value(result)?)
    }

    pub async fn history_export(&self) -> Result<Value> {
        let snapshot = self.state.snapshot().await;
        let artifact = export::history_artifact(&snapshot.history, Utc::now())?;
        Ok(serde_json::to_value(artifact)?)
    }

    // ========================================================================
    // Settings Commands
    // ========================================================================

    pub async fn settings_get(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.state.snapshot().await.settings)?)
    }

    pub async fn settings_update(&self, params: Value) -> Result<Value> {
        let update: SettingsUpdate = optional_params(params)?;

        self.state
            .dispatch(Transition::UpdateSettings(update))
            .await?;

        Ok(serde_json::to_value(self.state.snapshot().await.settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use serde_json::json;
    use tempfile::TempDir;

    const PEOPLE_CSV: &str = "name,department,salary\n\
                              Alice,Engineering,95000\n\
                              Bob,Marketing,60000\n\
                              Carol,Engineering,105000";

    fn test_context() -> (TempDir, Arc<AppState>, CommandContext) {
        let temp = TempDir::new().unwrap();
        let state = Arc::new(AppState::new(SessionStore::new(temp.path().to_path_buf())));
        let context = CommandContext::new(Arc::clone(&state), None);
        (temp, state, context)
    }

    async fn upload_people(context: &CommandContext) -> Value {
        context
            .dataset_upload(json!({"fileName": "people.csv", "content": PEOPLE_CSV}))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_local_mode() {
        let (_temp, _state, context) = test_context();

        let result = context.initialize().await.unwrap();

        assert_eq!(result["protocolVersion"], "1.0");
        assert_eq!(result["serverInfo"]["name"], "querify");
        assert_eq!(result["remoteBackend"], false);
    }

    #[tokio::test]
    async fn test_upload_returns_message_and_stats() {
        let (_temp, state, context) = test_context();

        let result = upload_people(&context).await;

        assert_eq!(
            result["message"],
            "Successfully uploaded people.csv with 3 rows"
        );
        assert_eq!(result["stats"]["rows"], 3);
        assert_eq!(result["stats"]["columns"], 3);
        assert_eq!(result["stats"]["numericColumns"], 1);
        assert_eq!(result["stats"]["textColumns"], 2);
        assert_eq!(result["stats"]["fileSize"], PEOPLE_CSV.len() as u64);

        let snapshot = state.snapshot().await;
        assert!(snapshot.table.is_some());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_csv_name() {
        let (_temp, state, context) = test_context();

        let error = context
            .dataset_upload(json!({"fileName": "people.txt", "content": PEOPLE_CSV}))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Please upload a CSV file");
        // Rejected before ingestion starts, so no error is recorded
        assert!(state.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_upload_parse_failure_records_error() {
        let (_temp, state, context) = test_context();

        let error = context
            .dataset_upload(json!({"fileName": "empty.csv", "content": ""}))
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Error parsing CSV file. Please check the file format."
        );
        assert_eq!(
            state.snapshot().await.error.as_deref(),
            Some("Error parsing CSV file. Please check the file format.")
        );
    }

    #[tokio::test]
    async fn test_load_reads_csv_from_disk() {
        let (temp, _state, context) = test_context();

        let csv_path = temp.path().join("people.csv");
        tokio::fs::write(&csv_path, PEOPLE_CSV).await.unwrap();

        let result = context
            .dataset_load(json!({"path": csv_path.to_string_lossy()}))
            .await
            .unwrap();

        assert_eq!(
            result["message"],
            "Successfully uploaded people.csv with 3 rows"
        );
        assert_eq!(result["stats"]["fileSize"], PEOPLE_CSV.len() as u64);
    }

    #[tokio::test]
    async fn test_load_missing_file_records_error() {
        let (temp, state, context) = test_context();

        let missing = temp.path().join("missing.csv");
        let error = context
            .dataset_load(json!({"path": missing.to_string_lossy()}))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Error reading file");
        assert_eq!(
            state.snapshot().await.error.as_deref(),
            Some("Error reading file")
        );
    }

    #[tokio::test]
    async fn test_preview_requires_data() {
        let (_temp, _state, context) = test_context();

        let error = context.dataset_preview(Value::Null).await.unwrap_err();
        assert_eq!(error.to_string(), "Please upload a CSV file first");
    }

    #[tokio::test]
    async fn test_preview_searches_and_sorts() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;

        let result = context
            .dataset_preview(json!({"search": "engineering", "sortBy": "salary", "sortDir": "desc"}))
            .await
            .unwrap();

        assert_eq!(result["matchedRows"], 2);
        assert_eq!(result["rows"][0]["name"], "Carol");
        assert_eq!(result["rows"][1]["name"], "Alice");
        assert_eq!(result["totalRows"], 3);
    }

    #[tokio::test]
    async fn test_stats_returns_profiles_and_label() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;

        let result = context.dataset_stats().await.unwrap();

        assert_eq!(result["stats"]["rows"], 3);
        assert!(result["fileSizeLabel"].as_str().unwrap().ends_with("Bytes"));

        let profiles = result["profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 3);

        let salary = profiles
            .iter()
            .find(|profile| profile["name"] == "salary")
            .unwrap();
        assert_eq!(salary["kind"], "numeric");
        assert_eq!(salary["stats"]["min"], 60000.0);
        assert_eq!(salary["stats"]["max"], 105000.0);
    }

    #[tokio::test]
    async fn test_csv_export_artifact() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;

        let result = context.dataset_export().await.unwrap();

        assert_eq!(result["fileName"], "data_preview.csv");
        let content = result["content"].as_str().unwrap();
        assert!(content.starts_with("name,department,salary\n"));
        assert!(content.contains("\"Alice\",\"Engineering\",\"95000\""));
    }

    #[tokio::test]
    async fn test_clear_drops_table_keeps_history() {
        let (_temp, state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        let result = context.dataset_clear().await.unwrap();
        assert_eq!(result["ok"], true);

        let snapshot = state.snapshot().await;
        assert!(snapshot.table.is_none());
        assert_eq!(snapshot.stats, DatasetStats::default());
        assert_eq!(snapshot.history.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_uses_local_rules() {
        let (_temp, state, context) = test_context();
        upload_people(&context).await;

        let result = context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        assert_eq!(result["sql"], "SELECT COUNT(*) as total_count FROM data;");
        assert_eq!(result["isTemplate"], true);
        assert_eq!(result["question"], "How many rows are there?");

        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(
            snapshot.current_query.as_ref().unwrap().question,
            "How many rows are there?"
        );
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_question() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;

        let error = context
            .query_generate(json!({"question": "   "}))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Please enter a question");
    }

    #[tokio::test]
    async fn test_generate_requires_data() {
        let (_temp, _state, context) = test_context();

        let error = context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Please upload a CSV file first");
    }

    #[tokio::test]
    async fn test_generate_history_write_failure_resets_loading() {
        // A store rooted at a regular file cannot create its data directory,
        // so appending to history fails while in-memory transitions succeed.
        let temp = TempDir::new().unwrap();
        let blocked = temp.path().join("not-a-directory");
        std::fs::write(&blocked, b"occupied").unwrap();
        let state = Arc::new(AppState::new(SessionStore::new(blocked)));
        let context = CommandContext::new(Arc::clone(&state), None);

        upload_people(&context).await;

        let error = context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap_err();
        assert!(error.to_string().starts_with("Failed to save session data"));

        let snapshot = state.snapshot().await;
        assert!(!snapshot.is_loading);
        assert!(snapshot.current_query.is_none());
        assert_eq!(snapshot.error, Some(error.to_string()));
        // The entry stays in memory even though the write failed.
        assert_eq!(snapshot.history.len(), 1);
    }

    #[tokio::test]
    async fn test_help_answers_locally() {
        let (_temp, state, context) = test_context();

        let result = context
            .query_help(json!({"question": "How do I join two tables?"}))
            .await
            .unwrap();

        assert_eq!(result["question"], "How do I join two tables?");
        assert!(result["answer"].as_str().unwrap().contains("INNER JOIN"));
        assert!(!state.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn test_help_rejects_blank_question() {
        let (_temp, _state, context) = test_context();

        let error = context.query_help(json!({"question": ""})).await.unwrap_err();
        assert_eq!(error.to_string(), "Please enter a SQL question");
    }

    #[tokio::test]
    async fn test_query_export_without_query_fails() {
        let (_temp, _state, context) = test_context();

        let error = context.query_export(Value::Null).await.unwrap_err();
        assert_eq!(error.to_string(), "No query to export");
    }

    #[tokio::test]
    async fn test_query_export_current_query() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        let result = context.query_export(Value::Null).await.unwrap();

        let content = result["content"].as_str().unwrap();
        assert!(content.starts_with("-- Generated SQL Query\n"));
        assert!(content.contains("-- Question: How many rows are there?"));
        assert!(!content.contains("-- Type:"));
        assert!(result["fileName"]
            .as_str()
            .unwrap()
            .starts_with("query_"));
    }

    #[tokio::test]
    async fn test_query_export_history_entry() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        let result = context.query_export(json!({"index": 0})).await.unwrap();
        assert!(result["content"]
            .as_str()
            .unwrap()
            .contains("-- Type: Template"));

        let error = context
            .query_export(json!({"index": 5}))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "No query to export");
    }

    #[tokio::test]
    async fn test_history_list_search_and_filter() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();
        context
            .query_generate(json!({"question": "Show me the average of salary"}))
            .await
            .unwrap();

        let all = context.history_list(Value::Null).await.unwrap();
        assert_eq!(all["total"], 2);
        assert_eq!(all["entries"].as_array().unwrap().len(), 2);
        assert_eq!(all["entries"][0]["timeAgo"], "Just now");

        let searched = context
            .history_list(json!({"search": "AVERAGE"}))
            .await
            .unwrap();
        assert_eq!(searched["entries"].as_array().unwrap().len(), 1);
        assert_eq!(
            searched["entries"][0]["question"],
            "Show me the average of salary"
        );
        assert_eq!(searched["total"], 2);

        let templates = context
            .history_list(json!({"filter": "templates"}))
            .await
            .unwrap();
        assert_eq!(templates["entries"].as_array().unwrap().len(), 2);

        let generated = context
            .history_list(json!({"filter": "generated"}))
            .await
            .unwrap();
        assert_eq!(generated["entries"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_history_search_matches_sql_text() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        let result = context
            .history_list(json!({"search": "count(*)"}))
            .await
            .unwrap();
        assert_eq!(result["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_export_empty_fails() {
        let (_temp, _state, context) = test_context();

        let error = context.history_export().await.unwrap_err();
        assert_eq!(error.to_string(), "No queries to export");
    }

    #[tokio::test]
    async fn test_history_export_bulk_artifact() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;
        context
            .query_generate(json!({"question": "How many rows are there?"}))
            .await
            .unwrap();

        let result = context.history_export().await.unwrap();

        assert!(result["fileName"]
            .as_str()
            .unwrap()
            .starts_with("querify_history_"));
        assert!(result["content"]
            .as_str()
            .unwrap()
            .starts_with("-- Query 1\n"));
    }

    #[tokio::test]
    async fn test_settings_get_and_update() {
        let (_temp, _state, context) = test_context();

        let initial = context.settings_get().await.unwrap();
        assert_eq!(initial["autoSave"], true);
        assert_eq!(initial["showExplanations"], true);

        let updated = context
            .settings_update(json!({"autoSave": false}))
            .await
            .unwrap();
        assert_eq!(updated["autoSave"], false);
        assert_eq!(updated["showExplanations"], true);
    }

    #[tokio::test]
    async fn test_state_get_summary() {
        let (_temp, _state, context) = test_context();
        upload_people(&context).await;

        let result = context.state_get().await.unwrap();

        assert_eq!(result["hasData"], true);
        assert_eq!(result["isLoading"], false);
        assert_eq!(result["historyLength"], 0);
        assert!(result["error"].is_null());
        assert_eq!(result["sampleQuestions"].as_array().unwrap().len(), 8);
        assert_eq!(
            result["sampleQuestions"][0],
            "Show me all records with values greater than 100"
        );
    }

    #[tokio::test]
    async fn test_state_clear_error() {
        let (_temp, state, context) = test_context();

        context
            .dataset_upload(json!({"fileName": "empty.csv", "content": ""}))
            .await
            .unwrap_err();
        assert!(state.snapshot().await.error.is_some());

        let result = context.state_clear_error().await.unwrap();
        assert_eq!(result["ok"], true);
        assert!(state.snapshot().await.error.is_none());
    }
}
