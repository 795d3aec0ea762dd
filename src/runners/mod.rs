// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 执行器模块
///
/// 自动化执行器接口、按类型查找的注册表和内置的日志执行器
pub mod logging_runner;
pub mod registry;
pub mod traits;

pub use registry::RunnerRegistry;
pub use traits::{RunContext, Runner, RunnerError};
