//! Configuration loading and management
//!
//! Handles parsing of the taskflow `config.toml`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::model::{Priority, StatusFilter};
use crate::store::{Latency, OpDelays};

pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Simulated store latency
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority for new tasks created without one
    #[serde(default = "default_task_priority")]
    pub default_priority: String,

    /// Status filter used by `task list` when none is given
    #[serde(default = "default_task_status")]
    pub default_status: String,
}

fn default_task_priority() -> String {
    "medium".to_string()
}

fn default_task_status() -> String {
    "active".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_task_priority(),
            default_status: default_task_status(),
        }
    }
}

impl TasksConfig {
    pub fn priority(&self) -> crate::error::Result<Priority> {
        self.default_priority.parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_priority: unknown priority '{}'",
                self.default_priority
            ))
        })
    }

    pub fn status(&self) -> crate::error::Result<StatusFilter> {
        self.default_status.parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_status: unknown status '{}' (expected all|active|completed)",
                self.default_status
            ))
        })
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.priority()?;
        self.status()?;
        Ok(())
    }
}

/// Latency configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Simulate store latency at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Task operation delays
    #[serde(default = "default_task_delays")]
    pub tasks: DelaysConfig,

    /// Category operation delays
    #[serde(default = "default_category_delays")]
    pub categories: DelaysConfig,
}

fn default_true() -> bool {
    true
}

fn default_task_delays() -> DelaysConfig {
    DelaysConfig::from(Latency::DEFAULT_TASKS)
}

fn default_category_delays() -> DelaysConfig {
    DelaysConfig::from(Latency::DEFAULT_CATEGORIES)
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tasks: default_task_delays(),
            categories: default_category_delays(),
        }
    }
}

impl LatencyConfig {
    pub fn latency(&self) -> Latency {
        if !self.enabled {
            return Latency::none();
        }
        Latency {
            tasks: self.tasks.delays(),
            categories: self.categories.delays(),
        }
    }
}

/// Per-operation delays in milliseconds. Missing keys fall back to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelaysConfig {
    #[serde(default)]
    pub get_all_ms: u64,
    #[serde(default)]
    pub get_by_id_ms: u64,
    #[serde(default)]
    pub create_ms: u64,
    #[serde(default)]
    pub update_ms: u64,
    #[serde(default)]
    pub delete_ms: u64,
}

impl DelaysConfig {
    pub fn delays(&self) -> OpDelays {
        OpDelays::from_millis(
            self.get_all_ms,
            self.get_by_id_ms,
            self.create_ms,
            self.update_ms,
            self.delete_ms,
        )
    }
}

impl From<OpDelays> for DelaysConfig {
    fn from(delays: OpDelays) -> Self {
        Self {
            get_all_ms: delays.get_all.as_millis() as u64,
            get_by_id_ms: delays.get_by_id.as_millis() as u64,
            create_ms: delays.create.as_millis() as u64,
            update_ms: delays.update.as_millis() as u64,
            delete_ms: delays.delete.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `explicit` when given (the file must exist), else from the
    /// platform config dir, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> crate::error::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.tasks.validate()
    }
}

/// `<platform config dir>/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskflow").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
