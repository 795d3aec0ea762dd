// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 任务列表操作、执行计划修改和执行器查询
pub mod runner_handler;
pub mod schedule_handler;
pub mod task_handler;
