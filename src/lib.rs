// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// HTTP 接口的数据传输对象和执行端会话
pub mod application;

/// 宿主与执行端之间的消息总线
pub mod bus;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含任务、执行计划等核心实体，排序引擎与计划服务，以及仓库接口
pub mod domain;

/// 基础设施模块
///
/// 提供任务库、迁移和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和界面文案
pub mod presentation;

/// 执行器模块
///
/// 按任务类型分派的自动化执行器
pub mod runners;

/// 工具模块
///
/// 提供时钟、错误类型和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现任务调度派发和执行
pub mod workers;
