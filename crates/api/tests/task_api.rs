//! HTTP-level integration tests for task and subtask endpoints.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{assert_error, body_json, build_test_app, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn create_task(pool: &PgPool, user_id: Uuid, body: serde_json::Value) -> serde_json::Value {
    let mut body = body;
    body["user_id"] = json!(user_id);
    let response = post_json(build_test_app(pool.clone()), "/api/v1/tasks", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["llm_configured"], false);
    assert_eq!(json["extraction_model"], "gemini-2.5-flash");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cors_admits_client_headers_and_exposes_request_id(pool: PgPool) {
    let app = build_test_app(pool);

    let preflight = Request::options("/api/v1/voice-tasks")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "apikey,x-client-info")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap();
    assert!(allowed.contains("apikey"));
    assert!(allowed.contains("x-client-info"));

    let request = Request::get("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers()["access-control-expose-headers"],
        "x-request-id"
    );
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_returns_201_with_defaults(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = create_task(&pool, user, json!({ "task_name": "  Call dentist " })).await;
    assert_eq!(task["task_name"], "Call dentist");
    assert_eq!(task["importance"], "medium");
    assert_eq!(task["duration"], "medium");
    assert_eq!(task["is_complete"], false);
    assert_eq!(task["chat_history"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_rejects_blank_name(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/tasks",
        json!({ "user_id": Uuid::new_v4(), "task_name": "   " }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_rejects_unknown_importance(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/tasks",
        json!({ "user_id": Uuid::new_v4(), "task_name": "x", "importance": "urgent" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_tasks_for_user(pool: PgPool) {
    let user = Uuid::new_v4();
    create_task(&pool, user, json!({ "task_name": "Older" })).await;
    create_task(&pool, user, json!({ "task_name": "Newer" })).await;
    create_task(
        &pool,
        Uuid::new_v4(),
        json!({ "task_name": "Someone else" }),
    )
    .await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/tasks?user_id={user}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let names: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["task_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Newer", "Older"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_and_update_task(pool: PgPool) {
    let task = create_task(&pool, Uuid::new_v4(), json!({ "task_name": "Draft" })).await;
    let id = task["id"].as_str().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}"),
        json!({ "duration": "long", "description": "Quarterly report" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(build_test_app(pool), &format!("/api/v1/tasks/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["task_name"], "Draft");
    assert_eq!(json["duration"], "long");
    assert_eq!(json["description"], "Quarterly report");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_task_returns_404(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        &format!("/api/v1/tasks/{}", Uuid::new_v4()),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Manage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manage_rename(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = create_task(&pool, user, json!({ "task_name": "Old name" })).await;
    let id = task["id"].as_str().unwrap();

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/tasks/{id}/manage"),
        json!({ "user_id": user, "action": "rename", "new_task_name": " New name " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Task renamed successfully");
    assert_eq!(json["task"]["task_name"], "New name");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manage_complete_removes_task(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = create_task(&pool, user, json!({ "task_name": "Finish" })).await;
    let id = task["id"].as_str().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/manage"),
        json!({ "user_id": user, "action": "complete" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["action"], "complete");
    assert_eq!(json["message"], "Task completed successfully");

    let response = get(build_test_app(pool), &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manage_foreign_task_is_denied(pool: PgPool) {
    let owner = Uuid::new_v4();
    let task = create_task(&pool, owner, json!({ "task_name": "Mine" })).await;
    let id = task["id"].as_str().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/manage"),
        json!({ "user_id": Uuid::new_v4(), "action": "delete" }),
    )
    .await;
    let json = assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    assert_eq!(json["error"], "Task not found or access denied");

    let response = get(build_test_app(pool), &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manage_rename_to_blank_is_rejected(pool: PgPool) {
    let user = Uuid::new_v4();
    let task = create_task(&pool, user, json!({ "task_name": "Keep" })).await;
    let id = task["id"].as_str().unwrap();

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/tasks/{id}/manage"),
        json!({ "user_id": user, "action": "rename", "new_task_name": "  " }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Focus time and chat
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_focus_time_and_chat(pool: PgPool) {
    let task = create_task(&pool, Uuid::new_v4(), json!({ "task_name": "Study" })).await;
    let id = task["id"].as_str().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/focus-time"),
        json!({ "focus_time": 3725, "check_in_minutes": 25 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["focus_time"], 3725);
    assert_eq!(json["task_name"], "Study");
    assert_eq!(json["elapsed"], "01:02:05");
    assert_eq!(json["session"]["elapsed_secs"], 3725);
    assert_eq!(json["session"]["check_in_interval_secs"], 1500);
    assert_eq!(json["session"]["active"], false);
    assert_eq!(json["session"]["check_in_pending"], false);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/focus-time"),
        json!({ "focus_time": 90 }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["focus_time"], 90);
    assert_eq!(json["session"]["check_in_interval_secs"], 60);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/focus-time"),
        json!({ "focus_time": -1 }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/tasks/{id}/chat"),
        json!({ "role": "user", "content": "I'm stuck on chapter 2" }),
    )
    .await;
    let history = body_json(response).await["data"].clone();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["role"], "user");
    assert!(history[0]["timestamp"].as_i64().unwrap() > 0);
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_and_complete_subtasks(pool: PgPool) {
    let task = create_task(&pool, Uuid::new_v4(), json!({ "task_name": "Move" })).await;
    let id = task["id"].as_str().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}/subtasks"),
        json!({ "steps": [
            { "id": "1", "title": "Pack", "details": [] },
            { "id": "2", "title": "Load", "details": ["heavy first"] }
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let subtasks = body_json(response).await["data"].clone();
    assert_eq!(subtasks[0]["order_index"], 1);
    assert_eq!(subtasks[1]["name"], "Load");

    let subtask_id = subtasks[0]["id"].as_str().unwrap();
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/subtasks/{subtask_id}"),
        json!({ "completed": true }),
    )
    .await;
    assert_eq!(body_json(response).await["completed"], true);

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(body_json(response).await["has_subtasks"], true);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/tasks/{id}/subtasks"),
    )
    .await;
    let listed = body_json(response).await["data"].clone();
    assert_eq!(listed[0]["completed"], true);
    assert_eq!(listed[1]["completed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_subtasks_rejects_blank_titles(pool: PgPool) {
    let task = create_task(&pool, Uuid::new_v4(), json!({ "task_name": "Move" })).await;
    let id = task["id"].as_str().unwrap();

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/tasks/{id}/subtasks"),
        json!({ "steps": [{ "id": "1", "title": " ", "details": [] }] }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subtasks_of_missing_task_is_404(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        &format!("/api/v1/tasks/{}/subtasks", Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
