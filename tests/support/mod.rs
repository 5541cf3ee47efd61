#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;
use taskflow::model::{Category, Priority, Task};
use tempfile::TempDir;

/// Isolated data and config files for one CLI test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("config.toml"), "[latency]\nenabled = false\n")
            .expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("snapshot.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.env_remove("RUST_LOG")
            .env_remove("TASKFLOW_NO_LATENCY")
            .env("TASKFLOW_DATA", self.data_path())
            .env("TASKFLOW_CONFIG", self.config_path())
            .current_dir(self.dir.path());
        cmd
    }

    /// Run with `--json`, assert success, and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run taskflow");
        assert!(
            output.status.success(),
            "taskflow {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        let payload: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
        assert_eq!(payload["status"], "success");
        payload["data"].clone()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn task(id: &str, completed: bool, priority: Priority, due: Option<NaiveDate>) -> Task {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    Task {
        id: id.to_string(),
        title: format!("Task {id}"),
        description: None,
        category_id: None,
        priority,
        completed,
        due_date: due,
        created_at: ts,
        updated_at: ts,
        completed_at: completed.then_some(ts),
    }
}

pub fn category(id: &str, name: &str, order: u32) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        color: "#3b82f6".to_string(),
        task_count: 0,
        order,
    }
}
