// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crontab::{Crontab, CrontabInterval};
use crate::domain::models::day_limit::DayLimit;
use crate::domain::models::day_of_week::DayOfWeekWhitelist;
use crate::domain::models::schedule::Schedule;
use crate::domain::models::task::Task;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 新增任务请求DTO
#[derive(Debug, Deserialize, Serialize, Validate, Default)]
pub struct CreateTaskRequestDto {
    /// 显示名称，缺省使用配置中的默认名称
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    /// 任务类型，缺省使用配置中的默认类型
    #[validate(length(min = 1, max = 64))]
    pub task_type: Option<String>,
}

/// 导入任务请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ImportTasksRequestDto {
    #[validate(length(min = 1), nested)]
    pub tasks: Vec<ImportTaskDto>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ImportTaskDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 64))]
    pub task_type: String,

    #[serde(default)]
    pub detail: String,

    #[serde(default)]
    pub schedule: Option<Schedule>,
}

impl From<ImportTaskDto> for Task {
    fn from(dto: ImportTaskDto) -> Self {
        Task {
            detail: dto.detail,
            schedule: dto.schedule.unwrap_or_default(),
            ..Task::new(dto.name, dto.task_type, 0)
        }
    }
}

/// 选中任务请求DTO
#[derive(Debug, Deserialize, Serialize)]
pub struct SelectTaskRequestDto {
    pub task_id: i64,
}

/// 立即执行请求DTO
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RunNowRequestDto {
    /// 覆盖的开始时间，缺省表示立即
    pub date_time: Option<NaiveDateTime>,
}

/// 修改执行计划请求DTO
///
/// 只修改出现的字段，其余保持原值
#[derive(Debug, Deserialize, Serialize, Validate, Default)]
pub struct UpdateScheduleRequestDto {
    #[validate(range(min = 0, max = 100))]
    pub priority: Option<i32>,

    pub crontab_enable: Option<bool>,

    pub crontab_first: Option<NaiveTime>,

    pub crontab_interval: Option<CrontabInterval>,

    pub day_of_week_whitelist: Option<DayOfWeekWhitelist>,

    pub limit_first_day: Option<bool>,

    pub limit_last_day: Option<bool>,

    pub first_day: Option<NaiveDate>,

    pub last_day: Option<NaiveDate>,
}

impl UpdateScheduleRequestDto {
    /// 把出现的字段合并进现有计划
    pub fn apply(self, schedule: Schedule) -> Schedule {
        let crontab = Crontab {
            enable: self.crontab_enable.unwrap_or(schedule.crontab.enable),
            first: self.crontab_first.unwrap_or(schedule.crontab.first),
            interval: self.crontab_interval.unwrap_or(schedule.crontab.interval),
        };
        let day_limit = DayLimit {
            limit_first_day: self
                .limit_first_day
                .unwrap_or(schedule.day_limit.limit_first_day),
            limit_last_day: self
                .limit_last_day
                .unwrap_or(schedule.day_limit.limit_last_day),
            first_day: self.first_day.unwrap_or(schedule.day_limit.first_day),
            last_day: self.last_day.unwrap_or(schedule.day_limit.last_day),
        };
        Schedule {
            priority: self.priority.unwrap_or(schedule.priority),
            crontab,
            day_of_week_whitelist: self
                .day_of_week_whitelist
                .unwrap_or(schedule.day_of_week_whitelist),
            day_limit,
        }
    }
}

/// 记录执行请求DTO
#[derive(Debug, Deserialize, Serialize)]
pub struct RecordExecutionRequestDto {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}
