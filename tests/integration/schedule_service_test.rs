// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{at, setup_repo};
use chrono::NaiveTime;
use gamebot::domain::models::crontab::{Crontab, CrontabInterval};
use gamebot::domain::models::schedule::Schedule;
use gamebot::domain::models::task::{Task, NEVER, NOT_YET};
use gamebot::domain::repositories::task_repository::TaskRepository;
use gamebot::domain::services::errors::ServiceError;
use gamebot::domain::services::schedule_service::ScheduleService;
use gamebot::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use gamebot::utils::clock::FixedClock;
use std::sync::Arc;

fn every_eight_hours() -> Crontab {
    Crontab {
        enable: true,
        first: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
        interval: CrontabInterval::Hour8,
    }
}

async fn service() -> (
    Arc<TaskRepositoryImpl>,
    Arc<FixedClock>,
    ScheduleService<TaskRepositoryImpl>,
) {
    let repo = setup_repo().await;
    let clock = Arc::new(FixedClock::new(at(2024, 1, 1, 5, 0)));
    let service = ScheduleService::new(repo.clone(), clock.clone());
    (repo, clock, service)
}

#[tokio::test]
async fn test_update_schedule_recomputes_from_last_stop() {
    let (repo, _clock, service) = service().await;
    let id = repo.add(&Task::new("A", "t", 4)).await.unwrap();
    service
        .record_execution(id, at(2024, 1, 1, 4, 50), at(2024, 1, 1, 5, 0))
        .await
        .unwrap();

    let task = service
        .update_schedule(id, |schedule| Schedule {
            crontab: every_eight_hours(),
            ..schedule
        })
        .await
        .unwrap();
    assert_eq!(task.status.next_start_date_time, at(2024, 1, 1, 12, 0));

    let stored = repo.get(id).await.unwrap().unwrap();
    assert_eq!(stored.schedule.crontab, every_eight_hours());
    assert_eq!(stored.order_id, 4);
}

#[tokio::test]
async fn test_priority_change_still_recomputes() {
    let (repo, _clock, service) = service().await;
    let id = repo.add(&Task::new("A", "t", 0)).await.unwrap();
    assert_eq!(
        repo.get(id).await.unwrap().unwrap().status.next_start_date_time,
        NOT_YET
    );

    let task = service
        .update_schedule(id, |schedule| Schedule {
            priority: 80,
            ..schedule
        })
        .await
        .unwrap();
    // 定时未启用，重新计算后永不执行
    assert_eq!(task.status.next_start_date_time, NEVER);
    assert_eq!(task.schedule.priority, 80);
}

#[tokio::test]
async fn test_record_execution_schedules_next_slot() {
    let (repo, _clock, service) = service().await;
    let id = repo
        .add(&Task {
            schedule: Schedule {
                crontab: every_eight_hours(),
                ..Default::default()
            },
            ..Task::new("A", "t", 0)
        })
        .await
        .unwrap();

    let task = service
        .record_execution(id, at(2024, 1, 1, 22, 0), at(2024, 1, 1, 23, 0))
        .await
        .unwrap();
    assert_eq!(task.status.last_execute_date_time.stop, at(2024, 1, 1, 23, 0));
    assert_eq!(task.status.next_start_date_time, at(2024, 1, 2, 4, 0));
}

#[tokio::test]
async fn test_missing_task_is_reported() {
    let (_repo, _clock, service) = service().await;
    let result = service.set_schedule(77, Schedule::default()).await;
    assert!(matches!(result, Err(ServiceError::TaskNotFound(77))));

    let result = service.record_execution(77, NOT_YET, NOT_YET).await;
    assert!(matches!(result, Err(ServiceError::TaskNotFound(77))));
}

#[tokio::test]
async fn test_due_tasks_ordered_by_priority_then_order() {
    let (repo, clock, service) = service().await;
    let low = repo
        .add(&Task {
            schedule: Schedule {
                priority: 10,
                ..Default::default()
            },
            ..Task::new("low", "t", 0)
        })
        .await
        .unwrap();
    let first_high = repo
        .add(&Task {
            schedule: Schedule {
                priority: 90,
                ..Default::default()
            },
            ..Task::new("high-1", "t", 1)
        })
        .await
        .unwrap();
    let second_high = repo
        .add(&Task {
            schedule: Schedule {
                priority: 90,
                ..Default::default()
            },
            ..Task::new("high-2", "t", 2)
        })
        .await
        .unwrap();
    let later = repo.add(&Task::new("later", "t", 3)).await.unwrap();
    let mut status = repo.get(later).await.unwrap().unwrap().status;
    status.next_start_date_time = at(2024, 1, 1, 6, 0);
    repo.update_status(later, &status).await.unwrap();

    let due: Vec<i64> = service
        .due_tasks()
        .await
        .unwrap()
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(due, vec![first_high, second_high, low]);

    clock.set(at(2024, 1, 1, 6, 0));
    assert_eq!(service.due_tasks().await.unwrap().len(), 4);
    assert_eq!(service.next_due().await.unwrap().unwrap().id, first_high);
}

#[tokio::test]
async fn test_never_tasks_are_not_due() {
    let (repo, clock, service) = service().await;
    let id = repo.add(&Task::new("A", "t", 0)).await.unwrap();
    service.set_schedule(id, Schedule::default()).await.unwrap();

    clock.set(NEVER);
    assert!(service.due_tasks().await.unwrap().is_empty());
}
