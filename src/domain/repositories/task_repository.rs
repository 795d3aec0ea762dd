// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::schedule::Schedule;
use crate::domain::models::task::{Task, TaskOrder, TaskStatus};
use async_trait::async_trait;
use futures::stream::BoxStream;
use sea_orm::DbErr;
use thiserror::Error;
use tokio::sync::watch;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 计划或状态字段无法编码/解码
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 一次批量修改
///
/// 插入、删除和排序更新在同一个事务中提交
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChangeSet {
    /// 新增任务，`id == 0` 时由存储分配
    pub insert: Vec<Task>,
    /// 删除的任务ID
    pub remove: Vec<i64>,
    /// 需要更新排序序号的任务
    pub reorder: Vec<TaskOrder>,
}

impl TaskChangeSet {
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.remove.is_empty() && self.reorder.is_empty()
    }
}

/// 任务仓库特质
///
/// 定义任务数据访问接口。列表总是按 `order_id` 升序返回。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 订阅有序任务列表，每次写入提交后推送最新列表
    fn observe_all(&self) -> watch::Receiver<Vec<Task>>;
    /// 订阅单个任务，任务被删除时推送 `None`
    fn observe(&self, id: i64) -> BoxStream<'static, Option<Task>>;
    /// 根据ID查找任务
    async fn get(&self, id: i64) -> Result<Option<Task>, RepositoryError>;
    /// 读取全部任务
    async fn list_all(&self) -> Result<Vec<Task>, RepositoryError>;
    /// 新增任务，返回分配的ID
    async fn add(&self, task: &Task) -> Result<i64, RepositoryError>;
    /// 批量新增任务
    async fn add_many(&self, tasks: &[Task]) -> Result<Vec<i64>, RepositoryError>;
    /// 更新整条任务
    async fn update(&self, task: &Task) -> Result<(), RepositoryError>;
    /// 批量更新整条任务
    async fn update_many(&self, tasks: &[Task]) -> Result<(), RepositoryError>;
    /// 删除任务
    async fn remove(&self, id: i64) -> Result<(), RepositoryError>;
    /// 批量删除任务
    async fn remove_many(&self, ids: &[i64]) -> Result<(), RepositoryError>;
    /// 任务总数
    async fn count(&self) -> Result<u64, RepositoryError>;
    /// 只更新排序序号
    async fn update_order_id(&self, id: i64, order_id: i32) -> Result<(), RepositoryError>;
    /// 只更新执行状态
    async fn update_status(&self, id: i64, status: &TaskStatus) -> Result<(), RepositoryError>;
    /// 只更新执行计划和状态，不触碰排序序号
    async fn update_schedule(
        &self,
        id: i64,
        schedule: &Schedule,
        status: &TaskStatus,
    ) -> Result<(), RepositoryError>;
    /// 在单个事务中提交批量修改，返回新插入任务的ID
    async fn commit(&self, changes: TaskChangeSet) -> Result<Vec<i64>, RepositoryError>;
}
