//! taskflow - task and category tracking library
//!
//! This library provides the core functionality for the taskflow CLI tool.
//!
//! # Core Concepts
//!
//! - **Tasks**: titled to-do items with priority, optional category and due date
//! - **Categories**: named, colored groupings for tasks
//! - **Filters**: status/priority/category/search criteria narrowing the task list
//! - **Derived views**: today's tasks, overdue tasks, completion rate, open counts
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `model`: Records, filter specification, create/update requests
//! - `output`: Human and JSON output envelopes
//! - `query`: Pure derivation functions over a task snapshot
//! - `storage`: Snapshot file load/save
//! - `store`: In-memory record store with simulated latency

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod query;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
