// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供SQLite任务库的连接、迁移和实体定义
pub mod connection;
pub mod entities;
