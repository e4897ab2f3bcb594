//! Optional operator configuration stored at `~/.salesos/config.json`.
//!
//! Everything has a sensible default, so a missing file is the common case,
//! not an error. The loaded struct is passed explicitly to whatever needs it —
//! there is no process-wide config global.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::queries::DEFAULT_CHURN_RISK_THRESHOLD;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Override for the database location. `None` means the default
    /// `~/.salesos/salesos.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// Churn-risk score above which an account counts as high-risk.
    #[serde(default = "default_churn_threshold")]
    pub churn_risk_threshold: f64,
}

fn default_churn_threshold() -> f64 {
    DEFAULT_CHURN_RISK_THRESHOLD
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            churn_risk_threshold: DEFAULT_CHURN_RISK_THRESHOLD,
        }
    }
}

impl StoreConfig {
    /// Load from `~/.salesos/config.json`. A missing or unreadable file falls
    /// back to defaults; a file that exists but fails to parse is logged and
    /// also falls back, so a typo never bricks startup.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".salesos").join("config.json"))
    }
}
