// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::task_request::{
    CreateTaskRequestDto, ImportTasksRequestDto, RunNowRequestDto, SelectTaskRequestDto,
};
use crate::application::dto::task_response::{
    OperationResponseDto, TaskItemDto, TaskListResponseDto,
};
use crate::config::settings::Settings;
use crate::domain::models::task::Task;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::errors::ServiceError;
use crate::domain::services::schedule_service::ScheduleService;
use crate::domain::services::task_ordering_engine::{Direction, TaskOrderingEngine};
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

type Engine<R> = Extension<Arc<TaskOrderingEngine<R>>>;

async fn list_response<R: TaskRepository + 'static>(
    engine: &TaskOrderingEngine<R>,
    schedule_service: &ScheduleService<R>,
) -> TaskListResponseDto {
    TaskListResponseDto::new(
        engine.state(),
        engine.can_restore().await,
        schedule_service.now(),
    )
}

/// 有序任务列表，附带选中状态和编辑模式
pub async fn list_tasks<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
) -> Json<TaskListResponseDto> {
    Json(list_response(&engine, &schedule_service).await)
}

pub async fn get_task<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskItemDto>, AppError> {
    let state = engine.state();
    let task = state
        .task_list
        .iter()
        .find(|task| task.id == id)
        .cloned()
        .ok_or(ServiceError::TaskNotFound(id))?;
    let selected = state.selected_task_id.contains(&id);
    Ok(Json(TaskItemDto::new(task, selected, schedule_service.now())))
}

/// 在末尾新增任务
pub async fn add_task<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<CreateTaskRequestDto>,
) -> Result<(StatusCode, Json<OperationResponseDto>), AppError> {
    payload.validate()?;
    let name = payload
        .name
        .unwrap_or_else(|| settings.tasks.default_name.clone());
    let task_type = payload
        .task_type
        .unwrap_or_else(|| settings.tasks.default_type.clone());

    let id = engine.add_task(name, task_type).await?;
    Ok((
        StatusCode::CREATED,
        Json(OperationResponseDto {
            success: true,
            affected: 1,
            task_ids: vec![id],
            ..Default::default()
        }),
    ))
}

/// 批量导入任务
pub async fn import_tasks<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Json(payload): Json<ImportTasksRequestDto>,
) -> Result<(StatusCode, Json<OperationResponseDto>), AppError> {
    payload.validate()?;
    let tasks: Vec<Task> = payload.tasks.into_iter().map(Into::into).collect();
    let ids = engine.add_tasks(tasks).await?;
    Ok((
        StatusCode::CREATED,
        Json(OperationResponseDto {
            success: true,
            affected: ids.len(),
            task_ids: ids,
            ..Default::default()
        }),
    ))
}

pub async fn toggle_edit_mode<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
) -> Json<TaskListResponseDto> {
    engine.toggle_edit_mode();
    Json(list_response(&engine, &schedule_service).await)
}

pub async fn toggle_selection<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
    Json(payload): Json<SelectTaskRequestDto>,
) -> Json<TaskListResponseDto> {
    engine.toggle_selection(payload.task_id);
    Json(list_response(&engine, &schedule_service).await)
}

pub async fn select_all<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
) -> Json<TaskListResponseDto> {
    engine.select_all();
    Json(list_response(&engine, &schedule_service).await)
}

/// 追加选中与锚点任务同类型的任务
pub async fn select_all_same_type<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    Extension(schedule_service): Extension<Arc<ScheduleService<R>>>,
    Json(payload): Json<SelectTaskRequestDto>,
) -> Json<TaskListResponseDto> {
    engine.select_all_same_type(payload.task_id);
    Json(list_response(&engine, &schedule_service).await)
}

async fn move_selected<R: TaskRepository + 'static>(
    engine: &TaskOrderingEngine<R>,
    direction: Direction,
) -> Result<Json<OperationResponseDto>, AppError> {
    let first_moved = engine.move_selected(direction).await?;
    Ok(Json(OperationResponseDto {
        success: first_moved.is_some(),
        affected: engine.state().selected_task_id.len(),
        first_moved,
        ..Default::default()
    }))
}

pub async fn move_up<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    move_selected(&engine, Direction::Up).await
}

pub async fn move_down<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    move_selected(&engine, Direction::Down).await
}

pub async fn duplicate_selected<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    let ids = engine.duplicate_selected().await?;
    Ok(Json(OperationResponseDto {
        success: !ids.is_empty(),
        affected: ids.len(),
        task_ids: ids,
        ..Default::default()
    }))
}

pub async fn remove_selected<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    let removed = engine.remove_selected().await?;
    Ok(Json(OperationResponseDto {
        success: removed > 0,
        affected: removed,
        ..Default::default()
    }))
}

/// 撤销最近一次删除
pub async fn restore_removed<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    let restored = engine.restore_removed().await?;
    Ok(Json(OperationResponseDto {
        success: restored,
        affected: if restored { engine.state().task_list.len() } else { 0 },
        ..Default::default()
    }))
}

pub async fn enable_run_now<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
    payload: Option<Json<RunNowRequestDto>>,
) -> Result<Json<OperationResponseDto>, AppError> {
    let date_time = payload.and_then(|Json(payload)| payload.date_time);
    let changed = engine.enable_run_now(date_time).await?;
    Ok(Json(OperationResponseDto {
        success: changed > 0,
        affected: changed,
        ..Default::default()
    }))
}

pub async fn disable_run_now<R: TaskRepository + 'static>(
    Extension(engine): Engine<R>,
) -> Result<Json<OperationResponseDto>, AppError> {
    let changed = engine.disable_run_now().await?;
    Ok(Json(OperationResponseDto {
        success: changed > 0,
        affected: changed,
        ..Default::default()
    }))
}
