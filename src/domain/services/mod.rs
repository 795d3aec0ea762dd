// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含任务管理的核心业务逻辑：
/// - 任务排序引擎（task_ordering_engine）：选中、批量移动、复制、删除与撤销
/// - 执行计划服务（schedule_service）：修改计划、记录执行、挑选到期任务
///
/// 两者都只依赖任务仓库接口和时钟，不关心具体的存储或传输方式。
pub mod errors;
pub mod schedule_service;
pub mod task_ordering_engine;
