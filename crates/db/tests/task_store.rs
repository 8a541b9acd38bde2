//! Integration tests for the task and subtask repositories.
//!
//! Exercises the repository layer against a real database:
//! - Task creation, defaults and per-user listing
//! - Ownership-scoped rename and delete
//! - Bulk insertion of extracted tasks
//! - Subtask replacement, completion and clearing
//! - Focus time and chat history updates

use sqlx::PgPool;
use uuid::Uuid;
use voicepath_core::extraction::ExtractedTask;
use voicepath_core::task::{ChatMessage, ChatRole, Importance, TaskDuration};
use voicepath_db::models::subtask::UpdateSubtask;
use voicepath_db::models::task::{CreateTask, UpdateTask};
use voicepath_db::repositories::{SubtaskRepo, TaskRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(user_id: Uuid, name: &str) -> CreateTask {
    CreateTask {
        user_id,
        task_name: name.to_string(),
        description: None,
        importance: None,
        duration: None,
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Test: Task CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_applies_defaults(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Water plants"))
        .await
        .unwrap();

    assert_eq!(task.user_id, user);
    assert_eq!(task.task_name, "Water plants");
    assert_eq!(task.importance, Importance::Medium);
    assert_eq!(task.duration, TaskDuration::Medium);
    assert!(!task.is_complete);
    assert!(!task.has_subtasks);
    assert_eq!(task.focus_time, 0);
    assert!(task.chat_history.0.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_scoped_and_newest_first(pool: PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let first = TaskRepo::create(&pool, &new_task(alice, "First"))
        .await
        .unwrap();
    let second = TaskRepo::create(&pool, &new_task(alice, "Second"))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task(bob, "Other"))
        .await
        .unwrap();

    let tasks = TaskRepo::list_by_user(&pool, alice).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, second.id);
    assert_eq!(tasks[1].id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_only_touches_given_fields(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Draft essay"))
        .await
        .unwrap();

    let updated = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            importance: Some(Importance::High),
            is_complete: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.task_name, "Draft essay");
    assert_eq!(updated.importance, Importance::High);
    assert_eq!(updated.duration, TaskDuration::Medium);
    assert!(updated.is_complete);

    let missing = TaskRepo::update(&pool, Uuid::new_v4(), &UpdateTask::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_importance_rejected_by_schema(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO tasks (user_id, task_name, importance) VALUES ($1, 'x', 'urgent')",
    )
    .bind(Uuid::new_v4())
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Test: Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rename_and_delete_require_ownership(pool: PgPool) {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(owner, "Call bank"))
        .await
        .unwrap();

    assert!(TaskRepo::find_owned(&pool, task.id, stranger)
        .await
        .unwrap()
        .is_none());
    assert!(TaskRepo::rename_owned(&pool, task.id, stranger, "Hijacked")
        .await
        .unwrap()
        .is_none());
    assert!(!TaskRepo::delete_owned(&pool, task.id, stranger)
        .await
        .unwrap());

    let renamed = TaskRepo::rename_owned(&pool, task.id, owner, "Call the bank")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.task_name, "Call the bank");

    assert!(TaskRepo::delete_owned(&pool, task.id, owner).await.unwrap());
    assert!(TaskRepo::find_by_id(&pool, task.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: Bulk insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_many_inserts_every_task(pool: PgPool) {
    let user = Uuid::new_v4();
    let extracted = vec![
        ExtractedTask {
            task_name: "Buy milk".into(),
            importance: Importance::Low,
            duration: TaskDuration::Short,
        },
        ExtractedTask {
            task_name: "Finish slides".into(),
            importance: Importance::High,
            duration: TaskDuration::Long,
        },
    ];

    let created = TaskRepo::create_many(&pool, user, &extracted)
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert!(created
        .iter()
        .all(|t| t.user_id == user && !t.is_complete && !t.has_subtasks));

    let slides = created
        .iter()
        .find(|t| t.task_name == "Finish slides")
        .unwrap();
    assert_eq!(slides.importance, Importance::High);
    assert_eq!(slides.duration, TaskDuration::Long);

    assert!(TaskRepo::create_many(&pool, user, &[])
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Test: Subtasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_subtasks_orders_and_flags_parent(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Move house"))
        .await
        .unwrap();

    let subtasks =
        SubtaskRepo::replace_for_task(&pool, task.id, &names(&["Pack", "Load", "Unpack"]))
            .await
            .unwrap();
    let order: Vec<i32> = subtasks.iter().map(|s| s.order_index).collect();
    assert_eq!(order, vec![1, 2, 3]);
    assert_eq!(subtasks[2].name, "Unpack");

    let task = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert!(task.has_subtasks);

    // Replacing again drops the old rows.
    SubtaskRepo::replace_for_task(&pool, task.id, &names(&["Hire van"]))
        .await
        .unwrap();
    let listed = SubtaskRepo::list_by_task(&pool, task.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order_index, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subtask_completion_and_clear(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Bake"))
        .await
        .unwrap();
    let subtasks = SubtaskRepo::replace_for_task(&pool, task.id, &names(&["Mix", "Bake"]))
        .await
        .unwrap();

    let done = SubtaskRepo::update(
        &pool,
        subtasks[0].id,
        &UpdateSubtask {
            completed: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(done.completed);
    assert_eq!(done.name, "Mix");

    let removed = SubtaskRepo::clear_for_task(&pool, task.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(SubtaskRepo::list_by_task(&pool, task.id)
        .await
        .unwrap()
        .is_empty());
    let task = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert!(!task.has_subtasks);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_task_cascades_to_subtasks(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Garden"))
        .await
        .unwrap();
    let subtasks = SubtaskRepo::replace_for_task(&pool, task.id, &names(&["Weed"]))
        .await
        .unwrap();

    TaskRepo::delete_owned(&pool, task.id, user).await.unwrap();
    assert!(SubtaskRepo::find_by_id(&pool, subtasks[0].id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_for_missing_task_fails(pool: PgPool) {
    let result = SubtaskRepo::replace_for_task(&pool, Uuid::new_v4(), &[])
        .await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

// ---------------------------------------------------------------------------
// Test: Focus time and chat history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_focus_time_and_chat_history(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = TaskRepo::create(&pool, &new_task(user, "Study"))
        .await
        .unwrap();

    let task = TaskRepo::set_focus_time(&pool, task.id, 1_500)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.focus_time, 1_500);

    let question = ChatMessage {
        role: ChatRole::User,
        content: "Where do I start?".into(),
        timestamp: 1,
    };
    let answer = ChatMessage {
        role: ChatRole::Assistant,
        content: "Open chapter one.".into(),
        timestamp: 2,
    };
    TaskRepo::append_chat(&pool, task.id, &[question.clone()])
        .await
        .unwrap();
    let task = TaskRepo::append_chat(&pool, task.id, &[answer.clone()])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(task.chat_history.0, vec![question, answer]);
}
