//! Derived task views.
//!
//! Everything here is a pure function of a task/category snapshot, a filter
//! and a reference date. Nothing reads the clock or touches the store.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Category, CategorySelection, Task, TaskFilter};

/// Apply `filter` and the sidebar `selection` to `tasks`, keeping input order.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter, selection: &CategorySelection) -> Vec<Task> {
    let query = filter.search_query.to_lowercase();
    tasks
        .iter()
        .filter(|task| matches_filter(task, filter, selection, &query))
        .cloned()
        .collect()
}

fn matches_filter(
    task: &Task,
    filter: &TaskFilter,
    selection: &CategorySelection,
    query: &str,
) -> bool {
    if !filter.status.accepts(task.completed) {
        return false;
    }

    if let CategorySelection::Category(selected) = selection {
        if task.category_id.as_deref() != Some(selected.as_str()) {
            return false;
        }
    }
    if !filter.category_ids.is_empty() && !filter.category_ids.contains(&task.category_id) {
        return false;
    }

    if !filter.priorities.is_empty() && !filter.priorities.contains(&task.priority) {
        return false;
    }

    query.is_empty() || matches_search(task, query)
}

/// `query` must already be lowercased.
fn matches_search(task: &Task, query: &str) -> bool {
    task.title.to_lowercase().contains(query)
        || task
            .description
            .as_deref()
            .map(|description| description.to_lowercase().contains(query))
            .unwrap_or(false)
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date.map(|due| due < today).unwrap_or(false)
}

pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date == Some(today)
}

pub fn todays_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| is_due_today(task, today))
        .cloned()
        .collect()
}

pub fn overdue_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| is_overdue(task, today))
        .cloned()
        .collect()
}

/// Percentage of completed tasks, `0.0` for an empty slice.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    completed as f64 / tasks.len() as f64 * 100.0
}

/// Display form of [`completion_rate`].
pub fn rounded_percent(rate: f64) -> u32 {
    rate.round().clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub id: String,
    pub name: String,
    pub color: String,
    pub open: usize,
}

/// Open-task counts for the "all" entry and each category.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCounts {
    pub all: usize,
    pub categories: Vec<CategoryCount>,
}

impl CategoryCounts {
    pub fn get(&self, category_id: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|entry| entry.id == category_id)
            .map(|entry| entry.open)
    }
}

pub fn category_task_counts(tasks: &[Task], categories: &[Category]) -> CategoryCounts {
    let open: Vec<&Task> = tasks.iter().filter(|task| !task.completed).collect();
    let categories = categories
        .iter()
        .map(|category| CategoryCount {
            id: category.id.clone(),
            name: category.name.clone(),
            color: category.color.clone(),
            open: open
                .iter()
                .filter(|task| task.category_id.as_deref() == Some(category.id.as_str()))
                .count(),
        })
        .collect();

    CategoryCounts {
        all: open.len(),
        categories,
    }
}

/// Sidebar summary: quick stats plus per-category counts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub completion_rate: f64,
    pub counts: CategoryCounts,
}

impl Dashboard {
    pub fn build(tasks: &[Task], categories: &[Category], today: NaiveDate) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            today,
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
            due_today: tasks.iter().filter(|task| is_due_today(task, today)).count(),
            overdue: tasks.iter().filter(|task| is_overdue(task, today)).count(),
            completion_rate: completion_rate(tasks),
            counts: category_task_counts(tasks, categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, StatusFilter};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, completed: bool, due: Option<NaiveDate>) -> Task {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: None,
            category_id: None,
            priority: Priority::Medium,
            completed,
            due_date: due,
            created_at: ts,
            updated_at: ts,
            completed_at: None,
        }
    }

    #[test]
    fn overdue_and_due_today_are_exclusive() {
        let today = date(2024, 6, 1);
        for due in [None, Some(date(2024, 5, 31)), Some(today), Some(date(2024, 6, 2))] {
            for completed in [false, true] {
                let t = task("x", completed, due);
                assert!(!(is_overdue(&t, today) && is_due_today(&t, today)));
            }
        }
    }

    #[test]
    fn completed_tasks_are_never_overdue_or_due_today() {
        let today = date(2024, 6, 1);
        assert!(!is_overdue(&task("a", true, Some(date(2024, 1, 1))), today));
        assert!(!is_due_today(&task("b", true, Some(today)), today));
    }

    #[test]
    fn future_and_undated_tasks_are_neither() {
        let today = date(2024, 6, 1);
        let future = task("a", false, Some(date(2024, 6, 2)));
        let undated = task("b", false, None);
        assert!(!is_overdue(&future, today) && !is_due_today(&future, today));
        assert!(!is_overdue(&undated, today) && !is_due_today(&undated, today));
    }

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(0.0), 0);
        assert_eq!(rounded_percent(66.666), 67);
        assert_eq!(rounded_percent(33.333), 33);
        assert_eq!(rounded_percent(100.0), 100);
    }

    #[test]
    fn status_only_filter_keeps_order() {
        let tasks = vec![task("3", false, None), task("2", true, None), task("1", false, None)];
        let filtered = filter_tasks(
            &tasks,
            &TaskFilter::with_status(StatusFilter::Active),
            &CategorySelection::All,
        );
        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
    }
}
