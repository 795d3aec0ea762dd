// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 任务（task）：持久化的自动化任务及其执行状态
/// - 执行计划（schedule）：每日定时、星期白名单、日期范围与优先级
/// - 模块配置（extra）：同一任务类型共享的配置
///
/// 执行计划的下一次执行时间计算是纯函数，不依赖存储或时钟实现。
pub mod crontab;
pub mod day_limit;
pub mod day_of_week;
pub mod extra;
pub mod schedule;
pub mod task;
