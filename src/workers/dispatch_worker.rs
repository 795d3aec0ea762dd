// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::bus::{BusError, HostBus, RunRequest, UiEvent, WorkerRequest};
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::schedule_service::ScheduleService;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 派发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub task_id: i64,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub error: Option<String>,
}

/// 宿主端调度工作器
///
/// 定期挑出优先级最高的到期任务，通过总线交给执行端，等待执行结束后
/// 记录执行窗口。执行失败同样记录，任务会按计划重新排期而不是立刻重试。
pub struct DispatchWorker<R>
where
    R: TaskRepository + 'static,
{
    schedule_service: Arc<ScheduleService<R>>,
    bus: HostBus,
    interval: Duration,
}

impl<R> DispatchWorker<R>
where
    R: TaskRepository + 'static,
{
    pub fn new(schedule_service: Arc<ScheduleService<R>>, bus: HostBus, interval: Duration) -> Self {
        Self {
            schedule_service,
            bus,
            interval,
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<Result<(), WorkerError>> {
        tokio::spawn(async move { self.run().await })
    }

    /// 派发一个到期任务并等待其结束
    ///
    /// # 返回值
    ///
    /// 没有到期任务时返回 `None`
    pub async fn dispatch_once(&self) -> Result<Option<DispatchOutcome>, WorkerError> {
        let Some(task) = self
            .schedule_service
            .next_due()
            .await
            .map_err(|e| WorkerError::ServiceError(e.to_string()))?
        else {
            return Ok(None);
        };

        let request = RunRequest::new(task.id);
        let run_id = request.run_id;
        // 先订阅再发送，避免错过执行端的结束事件
        let mut events = self.bus.subscribe_events();
        self.bus
            .send(WorkerRequest::RunTask(request))
            .await
            .map_err(|e| WorkerError::ChannelClosed(e.to_string()))?;
        counter!("gamebot_dispatched_total").increment(1);
        debug!(task_id = task.id, run_id = %run_id, "Task dispatched");

        let outcome = loop {
            match events.recv().await {
                Ok(UiEvent::TaskFinished {
                    run_id: finished,
                    task_id,
                    start,
                    stop,
                    error,
                }) if finished == run_id => {
                    break DispatchOutcome {
                        task_id,
                        start,
                        stop,
                        error,
                    };
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dispatcher lagged behind worker events");
                }
                Err(RecvError::Closed) => {
                    return Err(WorkerError::ChannelClosed(BusError::Closed.to_string()));
                }
            }
        };

        self.schedule_service
            .record_execution(outcome.task_id, outcome.start, outcome.stop)
            .await
            .map_err(|e| WorkerError::ServiceError(e.to_string()))?;
        Ok(Some(outcome))
    }
}

#[async_trait]
impl<R> Worker for DispatchWorker<R>
where
    R: TaskRepository + 'static,
{
    async fn run(&self) -> Result<(), WorkerError> {
        info!(interval = ?self.interval, "Dispatch worker started");
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            // 一次 tick 内把所有到期任务依次派发完
            loop {
                match self.dispatch_once().await {
                    Ok(Some(outcome)) => {
                        if let Some(e) = outcome.error {
                            warn!(task_id = outcome.task_id, "Dispatched task failed: {}", e);
                        }
                    }
                    Ok(None) => break,
                    Err(WorkerError::ChannelClosed(e)) => {
                        info!("Dispatch worker stopped: {}", e);
                        return Ok(());
                    }
                    Err(e) => {
                        error!("Failed to dispatch task: {}", e);
                        break;
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "dispatch_worker"
    }
}
