// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::bus::UiEvent;
use crate::domain::models::extra::Extra;
use crate::domain::models::task::Task;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// 执行器错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// 没有注册该类型的执行器
    #[error("未注册的任务类型: {0}")]
    NotRegistered(String),

    /// 执行器不支持该能力
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 执行失败
    #[error("执行失败: {0}")]
    Failed(String),
}

/// 一次执行的上下文
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 要执行的任务
    pub task: Task,
    /// 同类型任务共享的模块配置
    pub extra: Option<Extra>,
    /// 用于推送提示
    pub events: broadcast::Sender<UiEvent>,
}

impl RunContext {
    /// 推送一条提示，没有订阅者时忽略
    pub fn toast(&self, message: impl Into<String>) {
        let _ = self.events.send(UiEvent::Toast {
            message: message.into(),
        });
    }
}

/// 自动化执行器
///
/// 每种任务类型对应一个执行器，由 [`super::registry::RunnerRegistry`] 按类型查找
#[async_trait]
pub trait Runner: Send + Sync {
    /// 执行器负责的任务类型
    fn task_type(&self) -> &str;

    /// 任务配置界面描述
    ///
    /// # 参数
    ///
    /// * `detail` - 任务当前的配置内容
    fn config_screen(&self, detail: &str) -> Value {
        let _ = detail;
        Value::Null
    }

    /// 执行中悬浮窗描述
    fn float_screen(&self) -> Option<Value> {
        None
    }

    /// 执行任务
    async fn run_task(&self, ctx: RunContext) -> Result<(), RunnerError>;
}
