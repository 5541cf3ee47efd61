//! taskflow task command implementations.

use chrono::NaiveDate;
use serde::Serialize;

use super::{resolve_today, Context};
use crate::error::{Error, Result};
use crate::model::{parse_due_date, CategorySelection, NewTask, Priority, Task, TaskFilter, TaskUpdate};
use crate::output::{emit_success, HumanOutput};
use crate::query::{filter_tasks, is_due_today, is_overdue, overdue_tasks, todays_tasks};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

pub struct ListOptions {
    pub status: Option<String>,
    pub priorities: Vec<String>,
    pub categories: Vec<String>,
    pub selection: String,
    pub search: Option<String>,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub category: Option<String>,
    pub uncategorize: bool,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub enum DueView {
    Today,
    Overdue,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct DueListOutput {
    today: NaiveDate,
    total: usize,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskDeletedOutput {
    id: String,
}

/// Category id given on the command line; `none` means uncategorized.
const UNCATEGORIZED: &str = "none";

pub async fn run_add(ctx: &mut Context, options: AddOptions) -> Result<()> {
    let priority = match options.priority.as_deref() {
        Some(value) => value.parse()?,
        None => ctx.config.tasks.priority()?,
    };
    let due_date = options.due.as_deref().map(parse_due_date).transpose()?;

    let mut warnings = Vec::new();
    if let Some(category_id) = options.category.as_deref() {
        warnings.extend(unknown_category_warning(ctx, category_id));
    }

    let request = NewTask {
        title: options.title,
        description: non_empty(options.description),
        category_id: non_empty(options.category),
        priority,
        due_date,
    };
    let task = ctx.repo.tasks.create(request).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task created");
    for warning in warnings {
        human.push_warning(warning);
    }
    push_task_summary(&mut human, &task);

    emit_success(ctx.output, "task add", &task, Some(&human))
}

pub async fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let status = match options.status.as_deref() {
        Some(value) => value.parse()?,
        None => ctx.config.tasks.status()?,
    };
    let mut filter = TaskFilter::with_status(status);
    for raw in &options.priorities {
        filter.priorities.insert(raw.parse::<Priority>()?);
    }
    for raw in &options.categories {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(UNCATEGORIZED) {
            filter.category_ids.insert(None);
        } else {
            filter.category_ids.insert(Some(trimmed.to_string()));
        }
    }
    filter.search_query = options.search.unwrap_or_default();
    let selection = CategorySelection::parse(&options.selection);

    let tasks = ctx.repo.tasks.get_all().await;
    let tasks = filter_tasks(&tasks, &filter, &selection);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    human.push_summary("Status", status.to_string());
    if let CategorySelection::Category(id) = &selection {
        human.push_summary("Category", id.clone());
    }
    if !filter.search_query.is_empty() {
        human.push_summary("Search", format!("{:?}", filter.search_query));
    }
    let today = resolve_today(None)?;
    for task in &tasks {
        human.push_detail(task_line(task, today));
    }

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };
    emit_success(ctx.output, "task list", &output, Some(&human))
}

pub async fn run_show(ctx: &Context, id: &str) -> Result<()> {
    let task = ctx.repo.tasks.get_by_id(id).await?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    push_task_summary(&mut human, &task);
    human.push_summary("Created", task.created_at.to_rfc3339());
    human.push_summary("Updated", task.updated_at.to_rfc3339());
    if let Some(completed_at) = task.completed_at {
        human.push_summary("Completed at", completed_at.to_rfc3339());
    }
    if let Some(description) = task.description.as_deref() {
        human.push_detail(description);
    }

    emit_success(ctx.output, "task show", &task, Some(&human))
}

pub async fn run_edit(ctx: &mut Context, options: EditOptions) -> Result<()> {
    let update = TaskUpdate {
        title: options.title,
        description: if options.clear_description {
            Some(None)
        } else {
            options.description.map(|value| non_empty(Some(value)))
        },
        category_id: if options.uncategorize {
            Some(None)
        } else {
            options.category.map(|value| non_empty(Some(value)))
        },
        priority: options
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        completed: options.completed,
        due_date: if options.clear_due {
            Some(None)
        } else {
            options
                .due
                .as_deref()
                .map(parse_due_date)
                .transpose()?
                .map(Some)
        },
    };
    if update.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one field".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    if let Some(Some(category_id)) = update.category_id.as_ref() {
        warnings.extend(unknown_category_warning(ctx, category_id));
    }

    let task = ctx.repo.tasks.update(&options.id, update).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task updated");
    for warning in warnings {
        human.push_warning(warning);
    }
    push_task_summary(&mut human, &task);

    emit_success(ctx.output, "task edit", &task, Some(&human))
}

pub async fn run_complete(ctx: &mut Context, id: &str) -> Result<()> {
    let task = ctx.repo.tasks.complete(id).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task completed");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());

    emit_success(ctx.output, "task complete", &task, Some(&human))
}

pub async fn run_delete(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.repo.tasks.delete(id).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", id);

    let output = TaskDeletedOutput { id: id.to_string() };
    emit_success(ctx.output, "task delete", &output, Some(&human))
}

pub async fn run_due(ctx: &Context, view: DueView, today: Option<&str>) -> Result<()> {
    let today = resolve_today(today)?;
    let tasks = ctx.repo.tasks.get_all().await;
    let (tasks, header, command) = match view {
        DueView::Today => (todays_tasks(&tasks, today), "Due today", "task today"),
        DueView::Overdue => (overdue_tasks(&tasks, today), "Overdue", "task overdue"),
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("Date", today.to_string());
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(task_line(task, today));
    }

    let output = DueListOutput {
        today,
        total: tasks.len(),
        tasks,
    };
    emit_success(ctx.output, command, &output, Some(&human))
}

fn unknown_category_warning(ctx: &Context, category_id: &str) -> Option<String> {
    let known = ctx
        .repo
        .categories
        .records()
        .iter()
        .any(|category| category.id == category_id);
    (!known).then(|| format!("category '{category_id}' does not exist"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary(
        "Category",
        task.category_id.clone().unwrap_or_else(|| "-".to_string()),
    );
    human.push_summary(
        "Due",
        task.due_date
            .map(|due| due.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    human.push_summary("Completed", task.completed.to_string());
}

fn task_line(task: &Task, today: NaiveDate) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}][{}] {} {}", task.priority, task.id, task.title);
    if let Some(due) = task.due_date {
        let note = if is_overdue(task, today) {
            " overdue"
        } else if is_due_today(task, today) {
            " today"
        } else {
            ""
        };
        line.push_str(&format!(" (due {due}{note})"));
    }
    if let Some(category) = task.category_id.as_deref() {
        line.push_str(&format!(" #{category}"));
    }
    line
}
