// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// HTTP 接口的数据传输对象和执行端会话
pub mod dto;
pub mod session;
