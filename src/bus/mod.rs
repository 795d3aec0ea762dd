// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 宿主与执行端之间的消息总线
//!
//! 宿主通过 [`HostBus`] 向执行端发送 [`WorkerRequest`]，执行端通过
//! [`WorkerBus`] 广播 [`UiEvent`]，宿主和界面订阅同一广播。

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// 总线错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// 对端已断开
    #[error("消息通道已关闭")]
    Closed,
}

/// 一次执行请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// 本次执行的唯一标识
    pub run_id: Uuid,
    /// 要执行的任务
    pub task_id: i64,
}

impl RunRequest {
    pub fn new(task_id: i64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            task_id,
        }
    }
}

/// 宿主发往执行端的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerRequest {
    RunTask(RunRequest),
    /// 断开会话并退出
    Stop,
}

/// 执行端广播给宿主和界面的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// 短提示
    Toast { message: String },
    TaskStarted {
        run_id: Uuid,
        task_id: i64,
        start: NaiveDateTime,
    },
    TaskFinished {
        run_id: Uuid,
        task_id: i64,
        start: NaiveDateTime,
        stop: NaiveDateTime,
        /// 执行失败时的错误描述
        error: Option<String>,
    },
}

/// 宿主端
#[derive(Clone)]
pub struct HostBus {
    request_tx: mpsc::Sender<WorkerRequest>,
    event_tx: broadcast::Sender<UiEvent>,
}

impl HostBus {
    /// 发送请求，执行端已退出时返回 [`BusError::Closed`]
    pub async fn send(&self, request: WorkerRequest) -> Result<(), BusError> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| BusError::Closed)
    }

    /// 订阅执行端事件，只能收到订阅之后发布的事件
    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.event_tx.subscribe()
    }
}

/// 执行端
pub struct WorkerBus {
    request_rx: mpsc::Receiver<WorkerRequest>,
    event_tx: broadcast::Sender<UiEvent>,
}

impl WorkerBus {
    /// 等待下一条请求，宿主端全部释放后返回 `None`
    pub async fn recv(&mut self) -> Option<WorkerRequest> {
        self.request_rx.recv().await
    }

    /// 广播事件，没有订阅者时直接丢弃
    pub fn publish(&self, event: UiEvent) {
        let _ = self.event_tx.send(event);
    }

    /// 事件发送端，供执行器推送提示
    pub fn events(&self) -> broadcast::Sender<UiEvent> {
        self.event_tx.clone()
    }
}

/// 创建一对总线端点
///
/// # 参数
///
/// * `request_capacity` - 请求队列容量
/// * `event_capacity` - 事件广播容量
pub fn message_bus(request_capacity: usize, event_capacity: usize) -> (HostBus, WorkerBus) {
    let (request_tx, request_rx) = mpsc::channel(request_capacity.max(1));
    let (event_tx, _) = broadcast::channel(event_capacity.max(1));
    (
        HostBus {
            request_tx,
            event_tx: event_tx.clone(),
        },
        WorkerBus {
            request_rx,
            event_tx,
        },
    )
}
