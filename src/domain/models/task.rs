// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::schedule::Schedule;

/// 永不执行的哨兵时间
pub const NEVER: NaiveDateTime = NaiveDateTime::MAX;

/// 从未执行过的哨兵时间，同时表示“立即执行”
pub const NOT_YET: NaiveDateTime = NaiveDateTime::MIN;

/// 复制任务时添加的名称前缀
pub const COPY_NAME_PREFIX: &str = "复制 ";

/// 一次执行的起止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeRange {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl Default for DateTimeRange {
    fn default() -> Self {
        Self {
            start: NOT_YET,
            stop: NOT_YET,
        }
    }
}

/// 任务执行状态
///
/// 记录上一次执行窗口和下一次计划开始时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatus {
    /// 上一次执行的起止时间
    pub last_execute_date_time: DateTimeRange,
    /// 下一次计划开始时间，[`NEVER`] 表示永不执行
    pub next_start_date_time: NaiveDateTime,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self {
            last_execute_date_time: DateTimeRange::default(),
            next_start_date_time: NOT_YET,
        }
    }
}

impl TaskStatus {
    /// 是否永不执行
    pub fn is_never(&self) -> bool {
        self.next_start_date_time.date() == NEVER.date()
    }

    /// 在 `now` 时是否到期
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.is_never() && self.next_start_date_time <= now
    }
}

/// 任务实体
///
/// 一个由外部自动化模块执行的持久化任务。`order_id` 是所有任务中
/// 从 0 开始的连续排名，任何引擎操作完成后都不会出现空洞或重复。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Task {
    /// 任务ID，0 表示尚未持久化，由存储在插入时分配
    pub id: i64,
    /// 显示名称
    pub name: String,
    /// 任务类型，决定由哪个自动化模块执行
    pub task_type: String,
    /// 模块自定义的任务配置
    pub detail: String,
    /// 执行计划
    pub schedule: Schedule,
    /// 排序序号
    pub order_id: i32,
    /// 执行状态
    pub status: TaskStatus,
}

impl Task {
    /// 创建一个尚未持久化的任务
    ///
    /// # 参数
    ///
    /// * `name` - 显示名称
    /// * `task_type` - 任务类型
    /// * `order_id` - 排序序号
    pub fn new(name: impl Into<String>, task_type: impl Into<String>, order_id: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            task_type: task_type.into(),
            order_id,
            ..Default::default()
        }
    }

    /// 生成紧跟在原任务之后的副本
    pub fn duplicate(&self, order_id: i32) -> Self {
        Self {
            id: 0,
            name: format!("{}{}", COPY_NAME_PREFIX, self.name),
            order_id,
            ..self.clone()
        }
    }

    /// 把任务放到新位置时对应的排序更新
    pub fn reordered(&self, order_id: i32) -> TaskOrder {
        TaskOrder {
            id: self.id,
            order_id,
        }
    }
}

/// 任务ID与排序序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskOrder {
    pub id: i64,
    pub order_id: i32,
}
