mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use taskflow::error::{exit_codes, Error};
use taskflow::model::{CategoryUpdate, NewCategory, NewTask, Priority, TaskUpdate};
use taskflow::storage::Snapshot;
use taskflow::store::{Clock, FixedClock, Latency, Repository};

use support::{category, date, task};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    ))
}

fn repo_with(clock: Arc<FixedClock>) -> Repository {
    Repository::new(Latency::none(), clock)
}

#[tokio::test]
async fn create_task_assigns_identity_and_defaults() {
    let clock = clock();
    let mut repo = repo_with(clock.clone());

    let mut request = NewTask::new("  Plan sprint  ");
    request.priority = Priority::High;
    request.due_date = Some(date(2024, 6, 3));
    let created = repo.tasks.create(request).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Plan sprint");
    assert!(!created.completed);
    assert_eq!(created.completed_at, None);
    assert_eq!(created.created_at, clock.now());
    assert_eq!(created.updated_at, clock.now());
    assert_eq!(repo.tasks.get_by_id(&created.id).await.unwrap(), created);
}

#[tokio::test]
async fn new_tasks_go_first() {
    let mut repo = repo_with(clock());
    let first = repo.tasks.create(NewTask::new("first")).await.unwrap();
    let second = repo.tasks.create(NewTask::new("second")).await.unwrap();
    assert_ne!(first.id, second.id);

    let all = repo.tasks.get_all().await;
    let ids: Vec<_> = all.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, [second.id, first.id]);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let mut repo = repo_with(clock());
    let err = repo.tasks.create(NewTask::new("   ")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(repo.tasks.get_all().await.is_empty());
}

#[tokio::test]
async fn update_refreshes_updated_at_and_merges_fields() {
    let clock = clock();
    let mut repo = repo_with(clock.clone());
    let created = repo.tasks.create(NewTask::new("Draft")).await.unwrap();

    clock.advance(chrono::Duration::minutes(5));
    let update = TaskUpdate {
        priority: Some(Priority::Urgent),
        description: Some(Some("with notes".to_string())),
        ..TaskUpdate::default()
    };
    let updated = repo.tasks.update(&created.id, update).await.unwrap();

    assert_eq!(updated.priority, Priority::Urgent);
    assert_eq!(updated.description.as_deref(), Some("with notes"));
    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.completed_at, None);
}

#[tokio::test]
async fn complete_then_reopen_tracks_completed_at() {
    let clock = clock();
    let mut repo = repo_with(clock.clone());
    let created = repo.tasks.create(NewTask::new("Ship")).await.unwrap();

    clock.advance(chrono::Duration::hours(1));
    let done = repo.tasks.complete(&created.id).await.unwrap();
    assert!(done.completed);
    assert_eq!(done.completed_at, Some(clock.now()));

    clock.advance(chrono::Duration::hours(1));
    let touched = repo
        .tasks
        .update(
            &created.id,
            TaskUpdate {
                title: Some("Ship it".to_string()),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(touched.completed_at, done.completed_at);

    let reopened = repo
        .tasks
        .update(&created.id, TaskUpdate::completed(false))
        .await
        .unwrap();
    assert!(!reopened.completed);
    assert_eq!(reopened.completed_at, None);
}

#[tokio::test]
async fn unknown_task_ids_are_not_found() {
    let mut repo = repo_with(clock());

    let err = repo.tasks.get_by_id("missing").await.unwrap_err();
    assert!(matches!(&err, Error::TaskNotFound(id) if id == "missing"));
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);

    assert!(matches!(
        repo.tasks.update("missing", TaskUpdate::completed(true)).await,
        Err(Error::TaskNotFound(_))
    ));
    assert!(matches!(
        repo.tasks.delete("missing").await,
        Err(Error::TaskNotFound(_))
    ));
}

#[tokio::test]
async fn delete_removes_task() {
    let mut repo = repo_with(clock());
    let keep = repo.tasks.create(NewTask::new("keep")).await.unwrap();
    let gone = repo.tasks.create(NewTask::new("gone")).await.unwrap();

    repo.tasks.delete(&gone.id).await.unwrap();
    let all = repo.tasks.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, keep.id);
}

#[tokio::test]
async fn categories_append_with_order() {
    let mut repo = repo_with(clock());
    let work = repo.categories.create(NewCategory::new("Work")).await.unwrap();
    let home = repo.categories.create(NewCategory::new("Home")).await.unwrap();

    assert_eq!(work.order, 0);
    assert_eq!(home.order, 1);
    assert_eq!(work.task_count, 0);
    assert_eq!(work.color, NewCategory::DEFAULT_COLOR);

    let all = repo.categories.get_all().await;
    assert_eq!(all, vec![work, home]);
}

#[tokio::test]
async fn category_update_and_not_found() {
    let mut repo = repo_with(clock());
    let work = repo.categories.create(NewCategory::new("Work")).await.unwrap();

    let updated = repo
        .categories
        .update(
            &work.id,
            CategoryUpdate {
                color: Some("#ef4444".to_string()),
                ..CategoryUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.color, "#ef4444");
    assert_eq!(updated.name, "Work");

    let blank = CategoryUpdate {
        name: Some(" ".to_string()),
        ..CategoryUpdate::default()
    };
    assert!(matches!(
        repo.categories.update(&work.id, blank).await,
        Err(Error::InvalidArgument(_))
    ));

    let err = repo.categories.get_by_id("nope").await.unwrap_err();
    assert!(matches!(err, Error::CategoryNotFound(_)));
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
}

#[tokio::test]
async fn deleting_category_keeps_its_tasks() {
    let clock = clock();
    let mut t = task("t1", false, Priority::Low, None);
    t.category_id = Some("work".to_string());
    let snapshot = Snapshot::new(clock.now(), vec![t], vec![category("work", "Work", 0)]);
    let mut repo = Repository::from_snapshot(snapshot, Latency::none(), clock);

    repo.categories.delete("work").await.unwrap();
    assert!(repo.categories.get_all().await.is_empty());

    let remaining = repo.tasks.get_by_id("t1").await.unwrap();
    assert_eq!(remaining.category_id.as_deref(), Some("work"));
}

#[tokio::test]
async fn snapshot_reflects_store_state() {
    let clock = clock();
    let mut repo = repo_with(clock.clone());
    repo.tasks.create(NewTask::new("a")).await.unwrap();
    repo.categories.create(NewCategory::new("c")).await.unwrap();

    let snapshot = repo.snapshot();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.categories.len(), 1);
    assert_eq!(snapshot.generated_at, clock.now());
}

#[tokio::test(start_paused = true)]
async fn operations_wait_out_simulated_latency() {
    let mut repo = Repository::new(Latency::simulated(), clock());

    let start = tokio::time::Instant::now();
    repo.tasks.create(NewTask::new("slow")).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(250));

    let start = tokio::time::Instant::now();
    repo.tasks.get_all().await;
    assert_eq!(start.elapsed(), Duration::from_millis(300));

    let start = tokio::time::Instant::now();
    let (tasks, categories) = repo.load_all().await;
    assert_eq!(start.elapsed(), Duration::from_millis(300));
    assert_eq!(tasks.len(), 1);
    assert!(categories.is_empty());
}
