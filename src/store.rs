//! Session storage logic
//!
//! Handles reading and writing the on-disk session files (query history and
//! settings) that survive restarts.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::query::GeneratedQuery;
use crate::settings::Settings;

/// File name for persisted query history
pub const HISTORY_FILE_NAME: &str = "history.json";

/// File name for persisted settings
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// ============================================================================
// Error Types
// ============================================================================

/// Typed error enum for session storage operations
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[serde(tag = "code", content = "details", rename_all = "camelCase")]
pub enum StoreError {
    /// Failed to write a session file
    #[error("Failed to save session data: {message}")]
    WriteError { message: String },
}

// ============================================================================
// Session Store
// ============================================================================

/// Durable store for query history and settings.
///
/// Each value lives in its own JSON file under the data directory. Reads
/// degrade to defaults when a file is missing or unreadable; writes go
/// through a temp file + rename so a crash never leaves a half-written file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at the given data directory.
    ///
    /// The directory is created lazily on first save.
    pub fn new(data_dir: PathBuf) -> Self {
        SessionStore { data_dir }
    }

    /// Returns the platform default data directory for this application.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("querify"))
            .unwrap_or_else(|| PathBuf::from(".querify"))
    }

    /// Path to the persisted history file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE_NAME)
    }

    /// Path to the persisted settings file
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    // ========================================================================
    // Load Functions
    // ========================================================================

    /// Loads the persisted query history.
    ///
    /// A missing, unreadable, or corrupt file yields an empty history so a
    /// bad session file never blocks startup.
    pub async fn load_history(&self) -> Vec<GeneratedQuery> {
        self.load_or_default(&self.history_path()).await
    }

    /// Loads the persisted settings, falling back to defaults.
    pub async fn load_settings(&self) -> Settings {
        self.load_or_default(&self.settings_path()).await
    }

    async fn load_or_default<T>(&self, path: &Path) -> T
    where
        T: DeserializeOwned + Default,
    {
        if !fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!("no session file at {}, using defaults", path.display());
            return T::default();
        }

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to read {}: {}", path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                T::default()
            }
        }
    }

    // ========================================================================
    // Save Functions
    // ========================================================================

    /// Saves the query history using an atomic write.
    pub async fn save_history(&self, history: &[GeneratedQuery]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(history).map_err(|e| StoreError::WriteError {
            message: format!("Failed to serialize history: {}", e),
        })?;
        self.write_atomic(&self.history_path(), &content).await
    }

    /// Saves the settings using an atomic write.
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(settings).map_err(|e| StoreError::WriteError {
                message: format!("Failed to serialize settings: {}", e),
            })?;
        self.write_atomic(&self.settings_path(), &content).await
    }

    /// Writes content to the target path via a temp file + rename.
    ///
    /// The temp file lives in the same directory as the target so the rename
    /// stays on one filesystem.
    async fn write_atomic(&self, target_path: &Path, content: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::WriteError {
                message: format!("Failed to create data directory: {}", e),
            })?;

        let temp_name = format!(".querify-{}.tmp", Uuid::new_v4());
        let temp_path = self.data_dir.join(temp_name);

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StoreError::WriteError {
                message: format!("Failed to create temp file: {}", e),
            })?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| StoreError::WriteError {
                message: format!("Failed to write to temp file: {}", e),
            })?;

        file.sync_all().await.map_err(|e| StoreError::WriteError {
            message: format!("Failed to sync temp file: {}", e),
        })?;

        // Atomic rename
        fs::rename(&temp_path, target_path).await.map_err(|e| {
            // Try to clean up temp file on error
            let _ = std::fs::remove_file(&temp_path);
            StoreError::WriteError {
                message: format!("Failed to rename temp file to target: {}", e),
            }
        })?;

        Ok(())
    }
}
