// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::Task;
use crate::domain::services::task_ordering_engine::MainState;
use crate::presentation::summary;
use chrono::NaiveDateTime;
use serde::Serialize;

/// 任务列表项，附带界面文案
#[derive(Debug, Serialize)]
pub struct TaskItemDto {
    #[serde(flatten)]
    pub task: Task,
    pub selected: bool,
    pub status_summary: String,
    pub crontab_summary: String,
    pub day_of_week_summary: String,
    pub day_limit_summary: String,
}

impl TaskItemDto {
    pub fn new(task: Task, selected: bool, now: NaiveDateTime) -> Self {
        Self {
            status_summary: summary::task_status_summary(&task.status, now),
            crontab_summary: summary::crontab_summary(&task.schedule.crontab),
            day_of_week_summary: summary::day_of_week_summary(&task.schedule.day_of_week_whitelist),
            day_limit_summary: summary::day_limit_summary(&task.schedule.day_limit),
            selected,
            task,
        }
    }
}

/// 任务列表响应DTO
#[derive(Debug, Serialize)]
pub struct TaskListResponseDto {
    pub tasks: Vec<TaskItemDto>,
    pub selected_task_id: Vec<i64>,
    pub edit_mode: bool,
    pub can_restore: bool,
}

impl TaskListResponseDto {
    pub fn new(state: MainState, can_restore: bool, now: NaiveDateTime) -> Self {
        let selected_task_id: Vec<i64> = state.selected_task_id.iter().copied().collect();
        let tasks = state
            .task_list
            .into_iter()
            .map(|task| {
                let selected = state.selected_task_id.contains(&task.id);
                TaskItemDto::new(task, selected, now)
            })
            .collect();
        Self {
            tasks,
            selected_task_id,
            edit_mode: state.edit_mode,
            can_restore,
        }
    }
}

/// 批量操作响应DTO
#[derive(Debug, Serialize, Default)]
pub struct OperationResponseDto {
    pub success: bool,
    /// 受影响的任务数量
    pub affected: usize,
    /// 新建任务的ID
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_ids: Vec<i64>,
    /// 移动后第一个任务的新位置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_moved: Option<i32>,
}

/// 执行器信息响应DTO
#[derive(Debug, Serialize)]
pub struct RunnerInfoDto {
    pub task_type: String,
    pub config_screen: serde_json::Value,
    pub float_screen: Option<serde_json::Value>,
}
