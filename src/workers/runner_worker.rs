// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::session::ServiceSession;
use crate::bus::{RunRequest, UiEvent, WorkerBus, WorkerRequest};
use crate::domain::repositories::extra_repository::ExtraRepository;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::runners::{RunContext, RunnerError, RunnerRegistry};
use crate::utils::clock::Clock;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 执行端工作器
///
/// 从总线接收执行请求，按任务类型找到执行器并运行，前后广播
/// `TaskStarted` 与 `TaskFinished`。收到 `Stop` 时断开会话并退出。
pub struct RunnerWorker<R, E>
where
    R: TaskRepository + 'static,
    E: ExtraRepository + 'static,
{
    bus: Mutex<WorkerBus>,
    registry: RunnerRegistry,
    task_repository: Arc<R>,
    extra_repository: Arc<E>,
    clock: Arc<dyn Clock>,
    session: Arc<ServiceSession>,
}

impl<R, E> RunnerWorker<R, E>
where
    R: TaskRepository + 'static,
    E: ExtraRepository + 'static,
{
    pub fn new(
        bus: WorkerBus,
        registry: RunnerRegistry,
        task_repository: Arc<R>,
        extra_repository: Arc<E>,
        clock: Arc<dyn Clock>,
        session: Arc<ServiceSession>,
    ) -> Self {
        Self {
            bus: Mutex::new(bus),
            registry,
            task_repository,
            extra_repository,
            clock,
            session,
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<Result<(), WorkerError>> {
        tokio::spawn(async move { self.run().await })
    }

    async fn execute(&self, bus: &WorkerBus, request: RunRequest) {
        let start = self.clock.now();
        bus.publish(UiEvent::TaskStarted {
            run_id: request.run_id,
            task_id: request.task_id,
            start,
        });
        counter!("gamebot_runs_total").increment(1);

        let result = self.run_task(bus, request.task_id).await;
        let stop = self.clock.now();
        let error = match result {
            Ok(()) => {
                info!(task_id = request.task_id, run_id = %request.run_id, "Task finished");
                None
            }
            Err(e) => {
                counter!("gamebot_runner_failures_total").increment(1);
                warn!(task_id = request.task_id, run_id = %request.run_id, "Task failed: {}", e);
                Some(e.to_string())
            }
        };

        bus.publish(UiEvent::TaskFinished {
            run_id: request.run_id,
            task_id: request.task_id,
            start,
            stop,
            error,
        });
    }

    async fn run_task(&self, bus: &WorkerBus, task_id: i64) -> Result<(), RunnerError> {
        let task = self
            .task_repository
            .get(task_id)
            .await
            .map_err(|e| RunnerError::Failed(e.to_string()))?
            .ok_or_else(|| RunnerError::Failed(format!("任务不存在: {}", task_id)))?;
        let runner = self.registry.resolve(&task.task_type)?;

        let extra = match self.extra_repository.get(&task.task_type).await {
            Ok(extra) => extra,
            Err(e) => {
                error!(task_type = %task.task_type, "Failed to load module config: {}", e);
                None
            }
        };

        runner
            .run_task(RunContext {
                task,
                extra,
                events: bus.events(),
            })
            .await
    }
}

#[async_trait]
impl<R, E> Worker for RunnerWorker<R, E>
where
    R: TaskRepository + 'static,
    E: ExtraRepository + 'static,
{
    async fn run(&self) -> Result<(), WorkerError> {
        info!(session_id = %self.session.id(), "Runner worker started");
        let mut bus = self.bus.lock().await;
        loop {
            match bus.recv().await {
                Some(WorkerRequest::RunTask(request)) => self.execute(&bus, request).await,
                Some(WorkerRequest::Stop) => {
                    self.session.disconnect();
                    info!("Runner worker stopped");
                    return Ok(());
                }
                None => {
                    self.session.disconnect();
                    return Err(WorkerError::ChannelClosed(
                        "宿主端已断开".to_string(),
                    ));
                }
            }
        }
    }

    fn name(&self) -> &str {
        "runner_worker"
    }
}
