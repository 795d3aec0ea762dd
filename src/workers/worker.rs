// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// 后台工作器
///
/// 调度（宿主侧）与执行（特权侧）两个角色都以此运行，
/// `run` 返回即表示该角色退出
#[async_trait]
pub trait Worker: Send + Sync {
    /// 运行主循环，直到收到停止请求或通道关闭
    async fn run(&self) -> Result<(), WorkerError>;

    /// 日志与指标中使用的名称
    fn name(&self) -> &str;
}
