// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::schedule_service::ScheduleService;
use crate::domain::services::task_ordering_engine::TaskOrderingEngine;
use crate::presentation::handlers::{runner_handler, schedule_handler, task_handler};
use crate::runners::RunnerRegistry;
use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 组装完整应用：路由、共享状态和请求日志
pub fn app<R: TaskRepository + 'static>(
    engine: Arc<TaskOrderingEngine<R>>,
    schedule_service: Arc<ScheduleService<R>>,
    registry: RunnerRegistry,
    settings: Arc<Settings>,
) -> Router {
    routes::<R>()
        .layer(Extension(engine))
        .layer(Extension(schedule_service))
        .layer(Extension(registry))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}

/// 创建应用路由
///
/// 处理器所需的引擎、计划服务、执行器注册表和配置通过 `Extension` 注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R: TaskRepository + 'static>() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route(
            "/v1/tasks",
            get(task_handler::list_tasks::<R>).post(task_handler::add_task::<R>),
        )
        .route("/v1/tasks/import", post(task_handler::import_tasks::<R>))
        .route(
            "/v1/tasks/edit-mode",
            post(task_handler::toggle_edit_mode::<R>),
        )
        .route(
            "/v1/tasks/selection/toggle",
            post(task_handler::toggle_selection::<R>),
        )
        .route("/v1/tasks/selection/all", post(task_handler::select_all::<R>))
        .route(
            "/v1/tasks/selection/same-type",
            post(task_handler::select_all_same_type::<R>),
        )
        .route("/v1/tasks/move-up", post(task_handler::move_up::<R>))
        .route("/v1/tasks/move-down", post(task_handler::move_down::<R>))
        .route(
            "/v1/tasks/duplicate",
            post(task_handler::duplicate_selected::<R>),
        )
        .route("/v1/tasks/remove", post(task_handler::remove_selected::<R>))
        .route("/v1/tasks/restore", post(task_handler::restore_removed::<R>))
        .route(
            "/v1/tasks/run-now",
            post(task_handler::enable_run_now::<R>).delete(task_handler::disable_run_now::<R>),
        )
        .route("/v1/tasks/due", get(schedule_handler::due_tasks::<R>))
        .route("/v1/tasks/{id}", get(task_handler::get_task::<R>))
        .route(
            "/v1/tasks/{id}/schedule",
            patch(schedule_handler::update_schedule::<R>),
        )
        .route(
            "/v1/tasks/{id}/executions",
            post(schedule_handler::record_execution::<R>),
        )
        .route("/v1/runners", get(runner_handler::list_runners))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
