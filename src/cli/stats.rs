//! taskflow stats command.

use super::{resolve_today, Context};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::query::{rounded_percent, Dashboard};

pub async fn run(ctx: &Context, today: Option<&str>) -> Result<()> {
    let today = resolve_today(today)?;
    let (tasks, mut categories) = ctx.repo.load_all().await;
    categories.sort_by_key(|category| category.order);
    let dashboard = Dashboard::build(&tasks, &categories, today);

    let mut human = HumanOutput::new("Stats");
    human.push_summary("Date", today.to_string());
    human.push_summary("Active", dashboard.active.to_string());
    human.push_summary("Completed", dashboard.completed.to_string());
    human.push_summary("Due today", dashboard.due_today.to_string());
    human.push_summary("Overdue", dashboard.overdue.to_string());
    human.push_summary(
        "Completion",
        format!("{}%", rounded_percent(dashboard.completion_rate)),
    );
    human.push_detail(format!("All: {}", dashboard.counts.all));
    for entry in &dashboard.counts.categories {
        human.push_detail(format!("{}: {}", entry.name, entry.open));
    }
    if dashboard.overdue > 0 {
        human.push_warning(format!("{} task(s) overdue", dashboard.overdue));
    }

    emit_success(ctx.output, "stats", &dashboard, Some(&human))
}
