// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// HTTP 接口的请求与响应结构，请求使用 validator 校验
pub mod task_request;
pub mod task_response;
