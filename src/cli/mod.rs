//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::parse_due_date;
use crate::output::OutputOptions;
use crate::storage::{self, load_snapshot, save_snapshot};
use crate::store::{Clock, Latency, Repository, SystemClock};

mod category;
mod stats;
mod task;

/// taskflow - tasks, categories and what is due
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snapshot file holding tasks and categories
    #[arg(long, global = true, env = "TASKFLOW_DATA")]
    pub data: Option<PathBuf>,

    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip the simulated store latency
    #[arg(long, global = true, env = "TASKFLOW_NO_LATENCY")]
    pub no_latency: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Completion rate, due and overdue counts, open tasks per category
    Stats {
        /// Reference date (defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<String>,

        /// low, medium, high or urgent (defaults to tasks.default_priority)
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks matching a filter
    List {
        /// all, active or completed (defaults to tasks.default_status)
        #[arg(short, long)]
        status: Option<String>,

        /// Accepted priorities (repeatable)
        #[arg(short, long = "priority")]
        priorities: Vec<String>,

        /// Accepted category ids, `none` for uncategorized (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Selected category id, or `all`
        #[arg(long = "in", default_value = "all")]
        selection: String,

        /// Case-insensitive text to find in title or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show a task
    Show { id: String },

    /// Edit task fields
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,

        #[arg(short, long, conflicts_with = "uncategorize")]
        category: Option<String>,

        #[arg(long)]
        uncategorize: bool,

        #[arg(short, long)]
        priority: Option<String>,

        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        #[arg(long)]
        clear_due: bool,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Mark a task completed
    Complete { id: String },

    /// Delete a task
    Delete { id: String },

    /// Open tasks due today
    Today {
        /// Reference date (defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },

    /// Open tasks past their due date
    Overdue {
        /// Reference date (defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        name: String,

        /// Display color, e.g. #3b82f6
        #[arg(long)]
        color: Option<String>,
    },

    /// List categories with their open task counts
    List,

    /// Show a category
    Show { id: String },

    /// Edit category fields
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        order: Option<u32>,
    },

    /// Delete a category (its tasks are kept)
    Delete { id: String },
}

/// Loaded configuration and repository for one invocation.
pub(crate) struct Context {
    pub config: Config,
    pub repo: Repository,
    pub output: OutputOptions,
    data_path: PathBuf,
}

impl Context {
    fn open(cli: &Cli) -> Result<Self> {
        let config = Config::resolve(cli.config.as_deref())?;
        let data_path = match cli.data.clone() {
            Some(path) => path,
            None => storage::default_snapshot_path()?,
        };
        let latency = if cli.no_latency {
            Latency::none()
        } else {
            config.latency.latency()
        };
        debug!(path = %data_path.display(), ?latency, "opening repository");

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let snapshot = load_snapshot(&data_path, clock.as_ref())?;
        let repo = Repository::from_snapshot(snapshot, latency, clock);
        Ok(Self {
            config,
            repo,
            output: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
            data_path,
        })
    }

    /// Persist the repository after a mutation.
    pub fn save(&self) -> Result<()> {
        save_snapshot(&self.data_path, &self.repo.snapshot())
    }
}

/// Reference date for due/overdue views.
pub(crate) fn resolve_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(value) => parse_due_date(value),
        None => Ok(Local::now().date_naive()),
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let mut ctx = Context::open(&self)?;
        match self.command {
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    description,
                    category,
                    priority,
                    due,
                } => {
                    task::run_add(
                        &mut ctx,
                        task::AddOptions {
                            title,
                            description,
                            category,
                            priority,
                            due,
                        },
                    )
                    .await
                }
                TaskCommands::List {
                    status,
                    priorities,
                    categories,
                    selection,
                    search,
                } => {
                    task::run_list(
                        &ctx,
                        task::ListOptions {
                            status,
                            priorities,
                            categories,
                            selection,
                            search,
                        },
                    )
                    .await
                }
                TaskCommands::Show { id } => task::run_show(&ctx, &id).await,
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    clear_description,
                    category,
                    uncategorize,
                    priority,
                    due,
                    clear_due,
                    completed,
                } => {
                    task::run_edit(
                        &mut ctx,
                        task::EditOptions {
                            id,
                            title,
                            description,
                            clear_description,
                            category,
                            uncategorize,
                            priority,
                            due,
                            clear_due,
                            completed,
                        },
                    )
                    .await
                }
                TaskCommands::Complete { id } => task::run_complete(&mut ctx, &id).await,
                TaskCommands::Delete { id } => task::run_delete(&mut ctx, &id).await,
                TaskCommands::Today { today } => {
                    task::run_due(&ctx, task::DueView::Today, today.as_deref()).await
                }
                TaskCommands::Overdue { today } => {
                    task::run_due(&ctx, task::DueView::Overdue, today.as_deref()).await
                }
            },
            Commands::Category(cmd) => match cmd {
                CategoryCommands::Add { name, color } => {
                    category::run_add(&mut ctx, name, color).await
                }
                CategoryCommands::List => category::run_list(&ctx).await,
                CategoryCommands::Show { id } => category::run_show(&ctx, &id).await,
                CategoryCommands::Edit {
                    id,
                    name,
                    color,
                    order,
                } => category::run_edit(&mut ctx, &id, name, color, order).await,
                CategoryCommands::Delete { id } => category::run_delete(&mut ctx, &id).await,
            },
            Commands::Stats { today } => stats::run(&ctx, today.as_deref()).await,
        }
    }
}
