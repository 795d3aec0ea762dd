// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供任务与模块配置仓库接口的SeaORM实现
pub mod extra_repo_impl;
pub mod task_repo_impl;
