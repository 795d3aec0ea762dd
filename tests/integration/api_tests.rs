// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, setup_repo};
use axum::http::StatusCode;
use axum_test::TestServer;
use gamebot::config::settings::Settings;
use gamebot::domain::repositories::task_repository::TaskRepository;
use gamebot::domain::services::schedule_service::ScheduleService;
use gamebot::domain::services::task_ordering_engine::TaskOrderingEngine;
use gamebot::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use gamebot::presentation::routes;
use gamebot::runners::logging_runner::LoggingRunner;
use gamebot::runners::RunnerRegistry;
use gamebot::utils::clock::FixedClock;
use serde_json::{json, Value};
use std::sync::Arc;

async fn create_server() -> (TestServer, Arc<TaskRepositoryImpl>) {
    let repo = setup_repo().await;
    let engine = Arc::new(TaskOrderingEngine::new(repo.clone()));
    let clock = Arc::new(FixedClock::new(at(2024, 1, 1, 5, 0)));
    let schedule_service = Arc::new(ScheduleService::new(repo.clone(), clock));
    let registry = RunnerRegistry::new();
    registry.register(Arc::new(LoggingRunner::new("star_rail_cn")));
    let settings = Arc::new(Settings::defaults().unwrap());

    let app = routes::app(engine, schedule_service, registry, settings);
    (TestServer::new(app).unwrap(), repo)
}

async fn add(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/v1/tasks")
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["task_ids"][0].as_i64().unwrap()
}

fn listed_names(body: &Value) -> Vec<String> {
    body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_and_version() {
    let (server, _repo) = create_server().await;
    server.get("/health").await.assert_text("OK");
    server
        .get("/v1/version")
        .await
        .assert_text(env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_add_uses_configured_defaults() {
    let (server, repo) = create_server().await;
    let response = server.post("/v1/tasks").json(&json!({})).await;
    response.assert_status(StatusCode::CREATED);

    let tasks = repo.list_all().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "新任务");
    assert_eq!(tasks[0].task_type, "star_rail_cn");
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let (server, repo) = create_server().await;
    let response = server.post("/v1/tasks").json(&json!({ "name": "" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_includes_summaries_and_selection() {
    let (server, _repo) = create_server().await;
    let a = add(&server, "A").await;
    add(&server, "B").await;

    server
        .post("/v1/tasks/selection/toggle")
        .json(&json!({ "task_id": a }))
        .await
        .assert_status_ok();

    let body = server.get("/v1/tasks").await.json::<Value>();
    assert_eq!(listed_names(&body), vec!["A", "B"]);
    assert_eq!(body["selected_task_id"], json!([a]));
    assert_eq!(body["edit_mode"], json!(false));
    assert_eq!(body["tasks"][0]["selected"], json!(true));
    assert_eq!(body["tasks"][0]["status_summary"], json!("现在开始"));
    assert_eq!(body["tasks"][0]["crontab_summary"], json!("无计划任务"));
}

#[tokio::test]
async fn test_move_duplicate_remove_restore_flow() {
    let (server, repo) = create_server().await;
    add(&server, "A").await;
    let b = add(&server, "B").await;

    server
        .post("/v1/tasks/selection/toggle")
        .json(&json!({ "task_id": b }))
        .await;
    let moved = server.post("/v1/tasks/move-up").await.json::<Value>();
    assert_eq!(moved["first_moved"], json!(0));

    let duplicated = server.post("/v1/tasks/duplicate").await.json::<Value>();
    assert_eq!(duplicated["affected"], json!(1));
    let body = server.get("/v1/tasks").await.json::<Value>();
    assert_eq!(listed_names(&body), vec!["B", "复制 B", "A"]);

    let removed = server.post("/v1/tasks/remove").await.json::<Value>();
    assert_eq!(removed["affected"], json!(1));
    let body = server.get("/v1/tasks").await.json::<Value>();
    assert_eq!(listed_names(&body), vec!["复制 B", "A"]);
    assert_eq!(body["can_restore"], json!(true));

    let restored = server.post("/v1/tasks/restore").await.json::<Value>();
    assert_eq!(restored["success"], json!(true));
    assert_eq!(repo.count().await.unwrap(), 3);

    let again = server.post("/v1/tasks/restore").await.json::<Value>();
    assert_eq!(again["success"], json!(false));
}

#[tokio::test]
async fn test_update_schedule_and_due_list() {
    let (server, repo) = create_server().await;
    let a = add(&server, "A").await;

    let body = server.get("/v1/tasks/due").await.json::<Value>();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = server
        .patch(&format!("/v1/tasks/{}/schedule", a))
        .json(&json!({
            "crontab_enable": true,
            "crontab_first": "04:00:00",
            "crontab_interval": "hour8",
            "priority": 70
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["crontab_summary"], json!("04:00点起，每日3次"));

    let task = repo.get(a).await.unwrap().unwrap();
    assert_eq!(task.schedule.priority, 70);
    // 从未执行过，参考时间为最小时间，第一天的第一个时刻
    assert!(task.status.next_start_date_time < at(2024, 1, 1, 5, 0));

    let response = server
        .post(&format!("/v1/tasks/{}/executions", a))
        .json(&json!({
            "start": "2024-01-01T04:30:00",
            "stop": "2024-01-01T05:00:00"
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["status_summary"],
        json!("今天12:00开始")
    );
    let body = server.get("/v1/tasks/due").await.json::<Value>();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_priority_is_rejected() {
    let (server, _repo) = create_server().await;
    let a = add(&server, "A").await;
    server
        .patch(&format!("/v1/tasks/{}/schedule", a))
        .json(&json!({ "priority": 101 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let (server, _repo) = create_server().await;
    server
        .get("/v1/tasks/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .patch("/v1/tasks/999/schedule")
        .json(&json!({ "priority": 10 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_run_now_endpoints() {
    let (server, repo) = create_server().await;
    let a = add(&server, "A").await;
    server
        .post("/v1/tasks/selection/all")
        .await
        .assert_status_ok();

    let response = server.delete("/v1/tasks/run-now").await.json::<Value>();
    assert_eq!(response["affected"], json!(1));
    let body = server.get(&format!("/v1/tasks/{}", a)).await.json::<Value>();
    assert_eq!(body["status_summary"], json!("永不开始"));

    let response = server
        .post("/v1/tasks/run-now")
        .json(&json!({ "date_time": "2024-01-02T08:00:00" }))
        .await
        .json::<Value>();
    assert_eq!(response["affected"], json!(1));
    let task = repo.get(a).await.unwrap().unwrap();
    assert_eq!(task.status.next_start_date_time, at(2024, 1, 2, 8, 0));

    server.post("/v1/tasks/run-now").await.assert_status_ok();
    let body = server.get(&format!("/v1/tasks/{}", a)).await.json::<Value>();
    assert_eq!(body["status_summary"], json!("现在开始"));
}

#[tokio::test]
async fn test_import_edit_mode_and_runners() {
    let (server, repo) = create_server().await;
    let response = server
        .post("/v1/tasks/import")
        .json(&json!({
            "tasks": [
                { "name": "X", "task_type": "genshin_cn" },
                { "name": "Y", "task_type": "genshin_cn", "detail": "{}" }
            ]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(repo.count().await.unwrap(), 2);

    server
        .post("/v1/tasks/import")
        .json(&json!({ "tasks": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body = server.post("/v1/tasks/edit-mode").await.json::<Value>();
    assert_eq!(body["edit_mode"], json!(true));

    let runners = server.get("/v1/runners").await.json::<Value>();
    assert_eq!(runners[0]["task_type"], json!("star_rail_cn"));
    assert_eq!(runners[0]["float_screen"], Value::Null);
}
