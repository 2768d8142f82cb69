//! intervals.icu credentials and the athlete's training context.
//!
//! Read from `~/.claude/skills/coach/.config.json`. The environment
//! variables `INTERVALS_ICU_API_KEY` and `INTERVALS_ICU_ATHLETE_ID` take
//! precedence over the file, and are enough on their own.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoachError, OptionExt, Result};

pub const API_KEY_ENV: &str = "INTERVALS_ICU_API_KEY";
pub const ATHLETE_ID_ENV: &str = "INTERVALS_ICU_ATHLETE_ID";

/// Location of the config file relative to the home directory.
const CONFIG_RELATIVE_PATH: &str = ".claude/skills/coach/.config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, alias = "api_key")]
    pub api_key: String,
    #[serde(default, alias = "athlete_id")]
    pub athlete_id: String,
    pub training_philosophy: Option<String>,
    pub context: Option<TrainingContext>,
}

/// Free-form coaching context kept alongside the credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingContext {
    pub weekly_hours: Option<f64>,
    pub weekly_hours_target: Option<f64>,
    pub training_days: Option<Vec<String>>,
    pub current_phase: Option<String>,
    pub training_consistency: Option<f64>,
    pub last_context_update: Option<String>,
    pub goals: Option<Vec<Goal>>,
    pub constraints: Option<Vec<String>>,
    pub ftp_test_status: Option<FtpTestStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpTestStatus {
    pub last_test: Option<String>,
    pub next_due: Option<String>,
    pub current_ftp: Option<u32>,
}

/// Default config file path under the user's home directory.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_config("could not resolve home directory")?;
    Ok(home.join(CONFIG_RELATIVE_PATH))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load from the default path, with environment overrides applied.
    pub fn load() -> Result<Self> {
        let path = default_path()?;
        let file = if path.exists() {
            Self::read(&path)?
        } else {
            debug!("[Config] No config file at {}", path.display());
            Self::default()
        };

        let config = file.with_overrides(env_value(API_KEY_ENV), env_value(ATHLETE_ID_ENV));
        config.validate(&path)?;
        Ok(config)
    }

    /// Load and validate a config file, without environment overrides.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoachError::Config {
                message: format!("configuration not found at {}", path.display()),
            });
        }
        let config = Self::read(path)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Parse config JSON. Credentials are not checked.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoachError::Config {
            message: format!("invalid configuration: {}", e),
        })
    }

    fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace credentials with the given values where present.
    pub fn with_overrides(mut self, api_key: Option<String>, athlete_id: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        if let Some(id) = athlete_id {
            self.athlete_id = id;
        }
        self
    }

    /// Both credentials must be non-empty.
    pub fn validate(&self, source: &Path) -> Result<()> {
        let missing = |field: &str, env: &str| CoachError::Config {
            message: format!(
                "missing {}; set {} or add it to {}",
                field,
                env,
                source.display()
            ),
        };
        if self.api_key.trim().is_empty() {
            return Err(missing("apiKey", API_KEY_ENV));
        }
        if self.athlete_id.trim().is_empty() {
            return Err(missing("athleteId", ATHLETE_ID_ENV));
        }
        Ok(())
    }
}
