// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::task_request::{RecordExecutionRequestDto, UpdateScheduleRequestDto};
use crate::application::dto::task_response::TaskItemDto;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::schedule_service::ScheduleService;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 修改执行计划并重新计算下一次开始时间
pub async fn update_schedule<R: TaskRepository + 'static>(
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateScheduleRequestDto>,
) -> Result<Json<TaskItemDto>, AppError> {
    payload.validate()?;
    let task = schedule_service
        .update_schedule(id, move |schedule| payload.apply(schedule))
        .await?;
    Ok(Json(TaskItemDto::new(task, false, schedule_service.now())))
}

/// 记录一次执行
pub async fn record_execution<R: TaskRepository + 'static>(
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordExecutionRequestDto>,
) -> Result<Json<TaskItemDto>, AppError> {
    let task = schedule_service
        .record_execution(id, payload.start, payload.stop)
        .await?;
    Ok(Json(TaskItemDto::new(task, false, schedule_service.now())))
}

/// 当前到期的任务，按派发顺序
pub async fn due_tasks<R: TaskRepository + 'static>(
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
) -> Result<Json<Vec<TaskItemDto>>, AppError> {
    let now = schedule_service.now();
    let tasks = schedule_service
        .due_tasks()
        .await?
        .into_iter()
        .map(|task| TaskItemDto::new(task, false, now))
        .collect();
    Ok(Json(tasks))
}
