//! Snapshot file for the record store.
//!
//! The store lives in memory; a CLI process reads the snapshot on startup and
//! writes it back after a mutating command.
//!
//! ```text
//! <data dir>/
//!   snapshot.json     # { schema_version, generated_at, tasks, categories }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Category, Task};
use crate::store::Clock;

pub const SNAPSHOT_SCHEMA_VERSION: &str = "taskflow.v1";
pub const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Snapshot {
    pub fn new(generated_at: DateTime<Utc>, tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
            generated_at,
            tasks,
            categories,
        }
    }

    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self::new(generated_at, Vec::new(), Vec::new())
    }
}

/// Platform data directory for taskflow, if one can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskflow").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_snapshot_path() -> Result<PathBuf> {
    default_data_dir()
        .map(|dir| dir.join(SNAPSHOT_FILE))
        .ok_or_else(|| {
            Error::OperationFailed(
                "cannot determine a data directory; pass --data <path>".to_string(),
            )
        })
}

/// Read a snapshot, or an empty one stamped by `clock` when the file does
/// not exist.
pub fn load_snapshot(path: &Path, clock: &dyn Clock) -> Result<Snapshot> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot yet");
        return Ok(Snapshot::empty(clock.now()));
    }

    let content = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
        return Err(Error::OperationFailed(format!(
            "unsupported snapshot schema '{}' in {}",
            snapshot.schema_version,
            path.display()
        )));
    }
    debug!(
        path = %path.display(),
        tasks = snapshot.tasks.len(),
        categories = snapshot.categories.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Write a snapshot atomically (temp file in the same directory, then rename).
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(snapshot)?;
    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| Error::Io(err.error))?;

    debug!(
        path = %path.display(),
        tasks = snapshot.tasks.len(),
        categories = snapshot.categories.len(),
        "snapshot saved"
    );
    Ok(())
}
