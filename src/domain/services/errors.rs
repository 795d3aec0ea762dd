// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::task_repository::RepositoryError;
use thiserror::Error;

/// 领域服务错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 存储读写失败，调用方应以存储中的最新列表为准
    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),

    /// 任务不存在
    #[error("任务不存在: {0}")]
    TaskNotFound(i64),
}
