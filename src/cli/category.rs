//! taskflow category command implementations.

use serde::Serialize;

use super::Context;
use crate::error::{Error, Result};
use crate::model::{Category, CategoryUpdate, NewCategory};
use crate::output::{emit_success, HumanOutput};
use crate::query::{category_task_counts, CategoryCounts};

#[derive(Serialize)]
struct CategoryListOutput {
    total: usize,
    categories: Vec<Category>,
    open_tasks: CategoryCounts,
}

#[derive(Serialize)]
struct CategoryDeletedOutput {
    id: String,
    orphaned_tasks: usize,
}

pub async fn run_add(ctx: &mut Context, name: String, color: Option<String>) -> Result<()> {
    let mut request = NewCategory::new(name);
    if let Some(color) = color {
        request.color = color;
    }
    let category = ctx.repo.categories.create(request).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Category created");
    push_category_summary(&mut human, &category);

    emit_success(ctx.output, "category add", &category, Some(&human))
}

pub async fn run_list(ctx: &Context) -> Result<()> {
    let (tasks, mut categories) = ctx.repo.load_all().await;
    categories.sort_by_key(|category| category.order);
    let counts = category_task_counts(&tasks, &categories);

    let mut human = HumanOutput::new("Categories");
    human.push_summary("Total", categories.len().to_string());
    human.push_summary("All open tasks", counts.all.to_string());
    for entry in &counts.categories {
        human.push_detail(format!(
            "{} {} ({}) open: {}",
            entry.id, entry.name, entry.color, entry.open
        ));
    }

    let output = CategoryListOutput {
        total: categories.len(),
        categories,
        open_tasks: counts,
    };
    emit_success(ctx.output, "category list", &output, Some(&human))
}

pub async fn run_show(ctx: &Context, id: &str) -> Result<()> {
    let category = ctx.repo.categories.get_by_id(id).await?;
    let open = ctx
        .repo
        .tasks
        .records()
        .iter()
        .filter(|task| !task.completed && task.category_id.as_deref() == Some(id))
        .count();

    let mut human = HumanOutput::new(format!("Category {}", category.id));
    push_category_summary(&mut human, &category);
    human.push_summary("Open tasks", open.to_string());

    emit_success(ctx.output, "category show", &category, Some(&human))
}

pub async fn run_edit(
    ctx: &mut Context,
    id: &str,
    name: Option<String>,
    color: Option<String>,
    order: Option<u32>,
) -> Result<()> {
    if name.is_none() && color.is_none() && order.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --name, --color or --order".to_string(),
        ));
    }
    let update = CategoryUpdate { name, color, order };
    let category = ctx.repo.categories.update(id, update).await?;
    ctx.save()?;

    let mut human = HumanOutput::new("Category updated");
    push_category_summary(&mut human, &category);

    emit_success(ctx.output, "category edit", &category, Some(&human))
}

pub async fn run_delete(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.repo.categories.delete(id).await?;
    ctx.save()?;

    let orphaned_tasks = ctx
        .repo
        .tasks
        .records()
        .iter()
        .filter(|task| task.category_id.as_deref() == Some(id))
        .count();

    let mut human = HumanOutput::new("Category deleted");
    human.push_summary("ID", id);
    if orphaned_tasks > 0 {
        human.push_warning(format!(
            "{orphaned_tasks} task(s) still reference this category"
        ));
    }

    let output = CategoryDeletedOutput {
        id: id.to_string(),
        orphaned_tasks,
    };
    emit_success(ctx.output, "category delete", &output, Some(&human))
}

fn push_category_summary(human: &mut HumanOutput, category: &Category) {
    human.push_summary("ID", category.id.clone());
    human.push_summary("Name", category.name.clone());
    human.push_summary("Color", category.color.clone());
    human.push_summary("Order", category.order.to_string());
}
