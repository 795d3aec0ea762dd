// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::traits::{Runner, RunnerError};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// 执行器注册表
///
/// 任务类型到执行器的并发映射
#[derive(Default, Clone)]
pub struct RunnerRegistry {
    runners: Arc<DashMap<String, Arc<dyn Runner>>>,
}

impl RunnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册执行器，同类型已存在时替换并返回旧的
    pub fn register(&self, runner: Arc<dyn Runner>) -> Option<Arc<dyn Runner>> {
        let task_type = runner.task_type().to_string();
        info!(task_type = %task_type, "Runner registered");
        self.runners.insert(task_type, runner)
    }

    pub fn get(&self, task_type: &str) -> Option<Arc<dyn Runner>> {
        self.runners
            .get(task_type)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// 查找执行器，未注册时返回错误
    pub fn resolve(&self, task_type: &str) -> Result<Arc<dyn Runner>, RunnerError> {
        self.get(task_type)
            .ok_or_else(|| RunnerError::NotRegistered(task_type.to_string()))
    }

    /// 已注册的任务类型，按字典序
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .runners
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        types.sort();
        types
    }
}
