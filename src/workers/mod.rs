// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 宿主端的调度工作器和执行端的执行器工作器
pub mod dispatch_worker;
pub mod runner_worker;
pub mod worker;

pub use worker::Worker;
