//! Application settings
//!
//! Two user-facing toggles, persisted on every change and rehydrated at
//! startup. Updates are partial merges so a client can flip one flag without
//! knowing the other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Persist newly generated queries to history automatically
    #[serde(default = "default_true")]
    pub auto_save: bool,
    /// Include plain-language explanations with generated queries
    #[serde(default = "default_true")]
    pub show_explanations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_save: true,
            show_explanations: true,
        }
    }
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub auto_save: Option<bool>,
    #[serde(default)]
    pub show_explanations: Option<bool>,
}

impl Settings {
    /// Merge a partial update into the current settings
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(auto_save) = update.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(show_explanations) = update.show_explanations {
            self.show_explanations = show_explanations;
        }
    }
}
