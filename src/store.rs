//! In-memory record store.
//!
//! `TaskStore` and `CategoryStore` own their records outright. Every operation
//! waits out a configured delay before touching the data, so callers see the
//! same asynchronous shape a remote API would give them. Mutations take
//! `&mut self`: there is only ever one writer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::model::{Category, CategoryUpdate, NewCategory, NewTask, Task, TaskUpdate};
use crate::storage::Snapshot;

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Per-operation delays for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDelays {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl OpDelays {
    pub const fn from_millis(
        get_all: u64,
        get_by_id: u64,
        create: u64,
        update: u64,
        delete: u64,
    ) -> Self {
        Self {
            get_all: Duration::from_millis(get_all),
            get_by_id: Duration::from_millis(get_by_id),
            create: Duration::from_millis(create),
            update: Duration::from_millis(update),
            delete: Duration::from_millis(delete),
        }
    }

    pub const fn zero() -> Self {
        Self::from_millis(0, 0, 0, 0, 0)
    }
}

/// Simulated latency for both collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub tasks: OpDelays,
    pub categories: OpDelays,
}

impl Latency {
    pub const DEFAULT_TASKS: OpDelays = OpDelays::from_millis(300, 200, 250, 200, 200);
    pub const DEFAULT_CATEGORIES: OpDelays = OpDelays::from_millis(200, 150, 250, 200, 200);

    /// Default delays, shaped like a remote API.
    pub fn simulated() -> Self {
        Self {
            tasks: Self::DEFAULT_TASKS,
            categories: Self::DEFAULT_CATEGORIES,
        }
    }

    pub fn none() -> Self {
        Self {
            tasks: OpDelays::zero(),
            categories: OpDelays::zero(),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::simulated()
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn generate_id() -> String {
    Ulid::new().to_string().to_ascii_lowercase()
}

pub struct TaskStore {
    tasks: Vec<Task>,
    delays: OpDelays,
    clock: Arc<dyn Clock>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>, delays: OpDelays, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            delays,
            clock,
        }
    }

    /// Records in store order, newest first.
    pub fn records(&self) -> &[Task] {
        &self.tasks
    }

    pub async fn get_all(&self) -> Vec<Task> {
        delay(self.delays.get_all).await;
        debug!(count = self.tasks.len(), "listing tasks");
        self.tasks.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task> {
        delay(self.delays.get_by_id).await;
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    pub async fn create(&mut self, request: NewTask) -> Result<Task> {
        request.validate()?;
        delay(self.delays.create).await;

        let now = self.clock.now();
        let task = Task {
            id: generate_id(),
            title: request.title.trim().to_string(),
            description: request.description,
            category_id: request.category_id,
            priority: request.priority,
            completed: false,
            due_date: request.due_date,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.tasks.insert(0, task.clone());
        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    pub async fn update(&mut self, id: &str, update: TaskUpdate) -> Result<Task> {
        update.validate()?;
        delay(self.delays.update).await;

        let now = self.clock.now();
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        update.apply(task, now);
        task.updated_at = now;
        debug!(task_id = %task.id, completed = task.completed, "task updated");
        Ok(task.clone())
    }

    pub async fn complete(&mut self, id: &str) -> Result<Task> {
        self.update(id, TaskUpdate::completed(true)).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        delay(self.delays.delete).await;
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        self.tasks.remove(index);
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

pub struct CategoryStore {
    categories: Vec<Category>,
    delays: OpDelays,
}

impl CategoryStore {
    pub fn new(categories: Vec<Category>, delays: OpDelays) -> Self {
        Self { categories, delays }
    }

    pub fn records(&self) -> &[Category] {
        &self.categories
    }

    pub async fn get_all(&self) -> Vec<Category> {
        delay(self.delays.get_all).await;
        debug!(count = self.categories.len(), "listing categories");
        self.categories.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Category> {
        delay(self.delays.get_by_id).await;
        self.categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    pub async fn create(&mut self, request: NewCategory) -> Result<Category> {
        request.validate()?;
        delay(self.delays.create).await;

        let order = u32::try_from(self.categories.len())
            .map_err(|_| Error::OperationFailed("too many categories".to_string()))?;
        let category = Category {
            id: generate_id(),
            name: request.name.trim().to_string(),
            color: request.color.trim().to_string(),
            task_count: 0,
            order,
        };
        self.categories.push(category.clone());
        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    pub async fn update(&mut self, id: &str, update: CategoryUpdate) -> Result<Category> {
        update.validate()?;
        delay(self.delays.update).await;

        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))?;
        update.apply(category);
        debug!(category_id = %category.id, "category updated");
        Ok(category.clone())
    }

    /// Tasks pointing at the category are left untouched.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        delay(self.delays.delete).await;
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))?;
        self.categories.remove(index);
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}

/// Owner of both collections for the lifetime of the application.
pub struct Repository {
    pub tasks: TaskStore,
    pub categories: CategoryStore,
    clock: Arc<dyn Clock>,
}

impl Repository {
    pub fn new(latency: Latency, clock: Arc<dyn Clock>) -> Self {
        Self::from_snapshot(Snapshot::empty(clock.now()), latency, clock)
    }

    pub fn from_snapshot(snapshot: Snapshot, latency: Latency, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: TaskStore::new(snapshot.tasks, latency.tasks, Arc::clone(&clock)),
            categories: CategoryStore::new(snapshot.categories, latency.categories),
            clock,
        }
    }

    /// Fetch both collections, waiting on the two reads together.
    pub async fn load_all(&self) -> (Vec<Task>, Vec<Category>) {
        tokio::join!(self.tasks.get_all(), self.categories.get_all())
    }

    /// Current state of both collections, without latency.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.clock.now(),
            self.tasks.records().to_vec(),
            self.categories.records().to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_lowercase_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a, a.to_ascii_lowercase());
        assert_eq!(a.len(), 26);
    }

    #[test]
    fn fixed_clock_advances() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(5));
    }

    #[test]
    fn latency_none_is_all_zero() {
        let latency = Latency::none();
        assert_eq!(latency.tasks, OpDelays::zero());
        assert_eq!(latency.categories, OpDelays::zero());
        assert_eq!(Latency::default(), Latency::simulated());
    }
}
