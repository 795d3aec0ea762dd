// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::traits::{RunContext, Runner, RunnerError};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

/// 只记录日志的执行器
///
/// 没有真实自动化模块时用作默认类型的执行器
pub struct LoggingRunner {
    task_type: String,
}

impl LoggingRunner {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
        }
    }
}

#[async_trait]
impl Runner for LoggingRunner {
    fn task_type(&self) -> &str {
        &self.task_type
    }

    fn config_screen(&self, detail: &str) -> Value {
        json!({
            "type": "text",
            "label": "配置",
            "value": detail,
        })
    }

    async fn run_task(&self, ctx: RunContext) -> Result<(), RunnerError> {
        info!(
            task_id = ctx.task.id,
            task_name = %ctx.task.name,
            task_type = %self.task_type,
            has_extra = ctx.extra.is_some(),
            "Running task"
        );
        ctx.toast(format!("开始执行 {}", ctx.task.name));
        Ok(())
    }
}
