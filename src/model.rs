//! Task and category records, the filter specification, and the explicit
//! create/update requests accepted by the record store.
//!
//! Records serialize as camelCase JSON, the shape the web front end reads.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task priority, lowest first.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown priority '{trimmed}' (expected low, medium, high or urgent)"
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Advisory only; nothing keeps it in sync with the task list.
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub order: u32,
}

/// Completion-state filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    #[default]
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn accepts(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !completed,
            StatusFilter::Completed => completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status '{other}' (expected all, active or completed)"
            ))),
        }
    }
}

/// Inclusive date range. Carried with the filter but not applied by
/// [`crate::query::filter_tasks`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Filter specification for the task list.
///
/// Empty sets and an empty query impose no restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub priorities: HashSet<Priority>,
    /// `None` members match uncategorized tasks.
    #[serde(default)]
    pub category_ids: HashSet<Option<String>>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl TaskFilter {
    pub fn with_status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Sidebar category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Category(String),
}

impl CategorySelection {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == Self::ALL_SENTINEL {
            CategorySelection::All
        } else {
            CategorySelection::Category(trimmed.to_string())
        }
    }
}

/// Request to create a task. Identity, timestamps and completion state are
/// assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// Partial update for a task.
///
/// Only fields set to `Some` are merged. For optional record fields the inner
/// `None` clears the value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskUpdate {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        Ok(())
    }

    /// Merge into `task`. Handles the `completed_at` transition; the caller
    /// refreshes `updated_at`.
    pub(crate) fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            match (task.completed, completed) {
                (false, true) => task.completed_at = Some(now),
                (true, false) => task.completed_at = None,
                _ => {}
            }
            task.completed = completed;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

impl NewCategory {
    pub const DEFAULT_COLOR: &'static str = "#6366f1";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Self::DEFAULT_COLOR.to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub order: Option<u32>,
}

impl CategoryUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(color) = self.color.as_deref() {
            validate_color(color)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(color) = self.color {
            category.color = color.trim().to_string();
        }
        if let Some(order) = self.order {
            category.order = order;
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<()> {
    if color.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "category color cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Parse a due date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// A timestamp keeps its local calendar date, the zone "today" is read in.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Local).date_naive())
        .map_err(|_| {
            Error::InvalidArgument(format!(
                "invalid date '{trimmed}' (expected YYYY-MM-DD or RFC 3339)"
            ))
        })
}

/// Serde adapter for `dueDate`: emits `YYYY-MM-DD`, accepts dates or full
/// timestamps.
mod due_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_due_date(value)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}
