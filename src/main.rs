// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use gamebot::application::session::ServiceSession;
use gamebot::bus::{message_bus, WorkerRequest};
use gamebot::config::settings::Settings;
use gamebot::domain::services::schedule_service::ScheduleService;
use gamebot::domain::services::task_ordering_engine::TaskOrderingEngine;
use gamebot::infrastructure::database::connection;
use gamebot::infrastructure::repositories::extra_repo_impl::ExtraRepositoryImpl;
use gamebot::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use gamebot::presentation::routes;
use gamebot::runners::logging_runner::LoggingRunner;
use gamebot::runners::RunnerRegistry;
use gamebot::utils::clock::{Clock, SystemClock};
use gamebot::utils::telemetry;
use gamebot::workers::dispatch_worker::DispatchWorker;
use gamebot::workers::runner_worker::RunnerWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    info!(format = ?settings.logging.format, "Starting gamebot...");

    gamebot::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to the task database and apply migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);

    // 4. Repositories and domain services
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    task_repo.refresh().await?;
    let extra_repo = Arc::new(ExtraRepositoryImpl::new(db.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let engine = Arc::new(TaskOrderingEngine::new(task_repo.clone()));
    engine.load().await?;
    let _follower = engine.spawn_store_follower();
    let schedule_service = Arc::new(ScheduleService::new(task_repo.clone(), clock.clone()));

    // 5. Runners
    let registry = RunnerRegistry::new();
    registry.register(Arc::new(LoggingRunner::new(
        settings.tasks.default_type.clone(),
    )));

    // 6. Workers
    let (host_bus, worker_bus) = message_bus(16, 64);
    let session = Arc::new(ServiceSession::new());
    session.on_disconnect(|| info!("Runner worker session released"));
    let runner_worker = RunnerWorker::new(
        worker_bus,
        registry.clone(),
        task_repo.clone(),
        extra_repo,
        clock,
        session,
    )
    .start();

    if settings.scheduler.enabled {
        DispatchWorker::new(
            schedule_service.clone(),
            host_bus.clone(),
            Duration::from_secs(settings.scheduler.tick_interval_secs.max(1)),
        )
        .start();
    } else {
        info!("Scheduler disabled, tasks only run on demand");
    }

    // 7. Start HTTP server
    let app = routes::app(engine, schedule_service, registry, settings.clone());
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    // 8. Stop the runner worker
    if host_bus.send(WorkerRequest::Stop).await.is_ok() {
        match runner_worker.await {
            Ok(Err(e)) => error!("Runner worker exited with error: {}", e),
            Err(e) => error!("Runner worker panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }
    info!("gamebot stopped");

    Ok(())
}
