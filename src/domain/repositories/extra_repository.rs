// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::extra::Extra;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;

/// 模块配置仓库特质
#[async_trait]
pub trait ExtraRepository: Send + Sync {
    /// 根据任务类型读取配置
    async fn get(&self, task_type: &str) -> Result<Option<Extra>, RepositoryError>;
    /// 读取全部配置
    async fn list(&self) -> Result<Vec<Extra>, RepositoryError>;
    /// 新增或覆盖配置
    async fn upsert(&self, extra: &Extra) -> Result<(), RepositoryError>;
    /// 仅在不存在时新增，返回是否写入
    async fn add_if_not_exist(&self, extra: &Extra) -> Result<bool, RepositoryError>;
    /// 删除配置
    async fn remove(&self, task_type: &str) -> Result<(), RepositoryError>;
}
