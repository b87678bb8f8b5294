//! Application state container
//!
//! Holds everything a session knows (loaded table, derived statistics, query
//! history, current query, settings) and applies the transitions command
//! handlers dispatch. History and settings changes are written through the
//! session store as part of the dispatch.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::dataset::{processor, DatasetError, DatasetStats, Table};
use crate::query::GeneratedQuery;
use crate::settings::{Settings, SettingsUpdate};
use crate::store::{SessionStore, StoreError};

// ============================================================================
// State Types
// ============================================================================

/// Full session state, cloned out as a snapshot for readers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Currently loaded table, if any
    pub table: Option<Table>,
    /// Statistics derived from the loaded table
    pub stats: DatasetStats,
    /// Generated queries, oldest first
    pub history: Vec<GeneratedQuery>,
    /// Most recently generated query
    pub current_query: Option<GeneratedQuery>,
    /// Whether a long-running operation is in flight
    pub is_loading: bool,
    /// User settings
    pub settings: Settings,
    /// Last reported error message, if any
    pub error: Option<String>,
}

/// A single state transition
#[derive(Debug, Clone)]
pub enum Transition {
    /// Store a freshly ingested table and recompute its statistics
    SetTable { table: Table, file_size: u64 },
    /// Append a generated query to the history
    AddHistoryEntry(GeneratedQuery),
    /// Replace the current query
    SetCurrentQuery(Option<GeneratedQuery>),
    /// Toggle the loading flag
    SetLoading(bool),
    /// Merge a partial settings update
    UpdateSettings(SettingsUpdate),
    /// Record an error message
    SetError(String),
    /// Drop the recorded error
    ClearError,
    /// Drop the table and its statistics, keeping history and settings
    ClearTable,
}

impl AppData {
    /// Applies one transition in place.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::SetTable { table, file_size } => {
                self.stats = processor::compute_stats(&table, file_size);
                self.table = Some(table);
            }
            Transition::AddHistoryEntry(entry) => {
                self.history.push(entry);
            }
            Transition::SetCurrentQuery(query) => {
                self.current_query = query;
            }
            Transition::SetLoading(loading) => {
                self.is_loading = loading;
            }
            Transition::UpdateSettings(update) => {
                self.settings.apply(&update);
            }
            Transition::SetError(message) => {
                self.error = Some(message);
            }
            Transition::ClearError => {
                self.error = None;
            }
            Transition::ClearTable => {
                self.table = None;
                self.stats = DatasetStats::default();
            }
        }
    }
}

// ============================================================================
// Shared State
// ============================================================================

/// Shared session state plus its backing store.
///
/// Command handlers clone snapshots out for reads and go through `dispatch`
/// for writes, so persistence never gets skipped.
pub struct AppState {
    data: Mutex<AppData>,
    store: SessionStore,
}

impl AppState {
    /// Creates an empty state backed by the given store.
    pub fn new(store: SessionStore) -> Self {
        AppState {
            data: Mutex::new(AppData::default()),
            store,
        }
    }

    /// Creates a state with history and settings restored from disk.
    pub async fn restore(store: SessionStore) -> Self {
        let data = AppData {
            history: store.load_history().await,
            settings: store.load_settings().await,
            ..AppData::default()
        };
        tracing::debug!("restored {} history entries", data.history.len());

        AppState {
            data: Mutex::new(data),
            store,
        }
    }

    /// Returns a clone of the current state.
    pub async fn snapshot(&self) -> AppData {
        self.data.lock().await.clone()
    }

    /// Returns a clone of the loaded table, or the no-data error.
    pub async fn require_table(&self) -> Result<Table, DatasetError> {
        self.data
            .lock()
            .await
            .table
            .clone()
            .ok_or(DatasetError::NoData)
    }

    /// Applies a transition and persists what it changed.
    pub async fn dispatch(&self, transition: Transition) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;

        let history_changed = matches!(transition, Transition::AddHistoryEntry(_));
        let settings_changed = matches!(transition, Transition::UpdateSettings(_));

        data.apply(transition);

        if history_changed {
            self.store.save_history(&data.history).await?;
        }
        if settings_changed {
            self.store.save_settings(&data.settings).await?;
        }

        Ok(())
    }
}
