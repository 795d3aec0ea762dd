// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::models::schedule::Schedule;
use crate::domain::models::task::{DateTimeRange, Task};
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::errors::ServiceError;
use crate::utils::clock::Clock;

/// 执行计划服务
///
/// 修改执行计划、记录执行结果，并以上一次执行结束时间为参考
/// 重新计算下一次开始时间
pub struct ScheduleService<R>
where
    R: TaskRepository + 'static,
{
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ScheduleService<R>
where
    R: TaskRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 以编辑函数修改执行计划
    ///
    /// 任意子字段（定时、星期、日期范围、优先级）变化后都会重新计算
    /// `next_start_date_time`
    ///
    /// # 返回值
    ///
    /// 更新后的任务
    pub async fn update_schedule<F>(&self, id: i64, edit: F) -> Result<Task, ServiceError>
    where
        F: FnOnce(Schedule) -> Schedule + Send,
    {
        let mut task = self
            .repository
            .get(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;

        task.schedule = edit(task.schedule);
        task.status.next_start_date_time = task
            .schedule
            .next_date_time(task.status.last_execute_date_time.stop);

        self.repository
            .update_schedule(id, &task.schedule, &task.status)
            .await?;
        debug!(
            task_id = id,
            next_start = %task.status.next_start_date_time,
            "Schedule updated"
        );
        Ok(task)
    }

    /// 整体替换执行计划
    pub async fn set_schedule(&self, id: i64, schedule: Schedule) -> Result<Task, ServiceError> {
        self.update_schedule(id, move |_| schedule).await
    }

    /// 记录一次执行并计算下一次开始时间
    pub async fn record_execution(
        &self,
        id: i64,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Task, ServiceError> {
        let mut task = self
            .repository
            .get(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;

        task.status.last_execute_date_time = DateTimeRange { start, stop };
        task.status.next_start_date_time = task.schedule.next_date_time(stop);
        self.repository.update_status(id, &task.status).await?;
        info!(
            task_id = id,
            next_start = %task.status.next_start_date_time,
            "Execution recorded"
        );
        Ok(task)
    }

    /// 当前已到期的任务
    ///
    /// 按优先级降序，其次按排序序号升序
    pub async fn due_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let now = self.clock.now();
        let mut due: Vec<Task> = self
            .repository
            .list_all()
            .await?
            .into_iter()
            .filter(|task| task.status.is_due(now))
            .collect();
        due.sort_by(|a, b| {
            b.schedule
                .priority
                .cmp(&a.schedule.priority)
                .then(a.order_id.cmp(&b.order_id))
        });
        Ok(due)
    }

    /// 下一个应执行的任务
    pub async fn next_due(&self) -> Result<Option<Task>, ServiceError> {
        Ok(self.due_tasks().await?.into_iter().next())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
