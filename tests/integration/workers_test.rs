// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, setup_db};
use async_trait::async_trait;
use gamebot::application::session::ServiceSession;
use gamebot::bus::{message_bus, RunRequest, UiEvent, WorkerRequest};
use gamebot::domain::models::extra::Extra;
use gamebot::domain::models::task::{Task, NEVER};
use gamebot::domain::repositories::extra_repository::ExtraRepository;
use gamebot::domain::repositories::task_repository::TaskRepository;
use gamebot::domain::services::schedule_service::ScheduleService;
use gamebot::infrastructure::repositories::extra_repo_impl::ExtraRepositoryImpl;
use gamebot::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use gamebot::runners::logging_runner::LoggingRunner;
use gamebot::runners::{RunContext, Runner, RunnerError, RunnerRegistry};
use gamebot::utils::clock::{Clock, FixedClock};
use gamebot::workers::dispatch_worker::DispatchWorker;
use gamebot::workers::runner_worker::RunnerWorker;
use gamebot::workers::Worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// 记录收到的上下文，按需失败
struct RecordingRunner {
    fail: bool,
    seen: Mutex<Vec<(i64, Option<String>)>>,
}

impl RecordingRunner {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Runner for RecordingRunner {
    fn task_type(&self) -> &str {
        "recording"
    }

    async fn run_task(&self, ctx: RunContext) -> Result<(), RunnerError> {
        self.seen
            .lock()
            .await
            .push((ctx.task.id, ctx.extra.map(|extra| extra.detail)));
        if self.fail {
            Err(RunnerError::Failed("模拟失败".to_string()))
        } else {
            Ok(())
        }
    }
}

struct Fixture {
    repo: Arc<TaskRepositoryImpl>,
    extras: Arc<ExtraRepositoryImpl>,
    clock: Arc<FixedClock>,
    registry: RunnerRegistry,
}

async fn fixture() -> Fixture {
    let db = setup_db().await;
    let repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    repo.refresh().await.unwrap();
    Fixture {
        repo,
        extras: Arc::new(ExtraRepositoryImpl::new(db)),
        clock: Arc::new(FixedClock::new(at(2024, 1, 1, 5, 0))),
        registry: RunnerRegistry::new(),
    }
}

#[tokio::test]
async fn test_dispatch_runs_due_task_and_records_execution() {
    let f = fixture().await;
    let runner = Arc::new(RecordingRunner::new(false));
    f.registry.register(runner.clone());
    f.extras
        .upsert(&Extra::new("recording", "shared"))
        .await
        .unwrap();
    let id = f.repo.add(&Task::new("A", "recording", 0)).await.unwrap();

    let (host, worker_bus) = message_bus(4, 16);
    let session = Arc::new(ServiceSession::new());
    let handle = RunnerWorker::new(
        worker_bus,
        f.registry.clone(),
        f.repo.clone(),
        f.extras.clone(),
        f.clock.clone() as Arc<dyn Clock>,
        session,
    )
    .start();

    let service = Arc::new(ScheduleService::new(f.repo.clone(), f.clock.clone()));
    let dispatcher = DispatchWorker::new(service, host.clone(), Duration::from_secs(1));

    let outcome = dispatcher.dispatch_once().await.unwrap().unwrap();
    assert_eq!(outcome.task_id, id);
    assert_eq!(outcome.error, None);
    assert_eq!(
        runner.seen.lock().await.clone(),
        vec![(id, Some("shared".to_string()))]
    );

    let task = f.repo.get(id).await.unwrap().unwrap();
    assert_eq!(task.status.last_execute_date_time.stop, at(2024, 1, 1, 5, 0));
    assert_eq!(task.status.next_start_date_time, NEVER);

    // 没有到期任务
    assert!(dispatcher.dispatch_once().await.unwrap().is_none());

    host.send(WorkerRequest::Stop).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_failed_run_is_still_recorded() {
    let f = fixture().await;
    f.registry.register(Arc::new(RecordingRunner::new(true)));
    let id = f.repo.add(&Task::new("A", "recording", 0)).await.unwrap();

    let (host, worker_bus) = message_bus(4, 16);
    let handle = RunnerWorker::new(
        worker_bus,
        f.registry.clone(),
        f.repo.clone(),
        f.extras.clone(),
        f.clock.clone() as Arc<dyn Clock>,
        Arc::new(ServiceSession::new()),
    )
    .start();
    let service = Arc::new(ScheduleService::new(f.repo.clone(), f.clock.clone()));
    let dispatcher = DispatchWorker::new(service, host.clone(), Duration::from_secs(1));

    let outcome = dispatcher.dispatch_once().await.unwrap().unwrap();
    assert!(outcome.error.unwrap().contains("模拟失败"));
    let task = f.repo.get(id).await.unwrap().unwrap();
    assert_eq!(task.status.next_start_date_time, NEVER);

    host.send(WorkerRequest::Stop).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unregistered_type_reports_error_event() {
    let f = fixture().await;
    f.registry
        .register(Arc::new(LoggingRunner::new("star_rail_cn")));
    let id = f.repo.add(&Task::new("A", "unknown", 0)).await.unwrap();

    let (host, worker_bus) = message_bus(4, 16);
    let mut events = host.subscribe_events();
    let handle = RunnerWorker::new(
        worker_bus,
        f.registry.clone(),
        f.repo.clone(),
        f.extras.clone(),
        f.clock.clone() as Arc<dyn Clock>,
        Arc::new(ServiceSession::new()),
    )
    .start();

    let request = RunRequest::new(id);
    host.send(WorkerRequest::RunTask(request.clone()))
        .await
        .unwrap();

    assert!(matches!(
        events.recv().await.unwrap(),
        UiEvent::TaskStarted { task_id, .. } if task_id == id
    ));
    match events.recv().await.unwrap() {
        UiEvent::TaskFinished { run_id, error, .. } => {
            assert_eq!(run_id, request.run_id);
            assert!(error.unwrap().contains("unknown"));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    host.send(WorkerRequest::Stop).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_stop_disconnects_session_once() {
    let f = fixture().await;
    let (host, worker_bus) = message_bus(4, 16);
    let session = Arc::new(ServiceSession::new());
    let released = Arc::new(AtomicBool::new(false));
    let flag = released.clone();
    session.on_disconnect(move || flag.store(true, Ordering::SeqCst));

    let worker = RunnerWorker::new(
        worker_bus,
        f.registry.clone(),
        f.repo.clone(),
        f.extras.clone(),
        f.clock.clone() as Arc<dyn Clock>,
        session.clone(),
    );
    assert_eq!(worker.name(), "runner_worker");
    let handle = worker.start();

    host.send(WorkerRequest::Stop).await.unwrap();
    handle.await.unwrap().unwrap();
    assert!(released.load(Ordering::SeqCst));
    assert!(!session.disconnect());
}

#[tokio::test]
async fn test_dispatch_fails_when_worker_gone() {
    let f = fixture().await;
    f.repo.add(&Task::new("A", "recording", 0)).await.unwrap();
    let (host, worker_bus) = message_bus(4, 16);
    drop(worker_bus);

    let service = Arc::new(ScheduleService::new(f.repo.clone(), f.clock.clone()));
    let dispatcher = DispatchWorker::new(service, host, Duration::from_secs(1));
    assert!(dispatcher.dispatch_once().await.is_err());
}
