// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 模块级配置
///
/// 同一任务类型的所有任务共享的配置，由自动化模块自行解释
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Extra {
    /// 任务类型
    pub task_type: String,
    /// 配置内容
    pub detail: String,
}

impl Extra {
    pub fn new(task_type: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            detail: detail.into(),
        }
    }
}
