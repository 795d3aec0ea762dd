// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::task_response::RunnerInfoDto;
use crate::runners::RunnerRegistry;
use axum::{extract::Extension, Json};

/// 已注册的执行器及其界面描述
pub async fn list_runners(Extension(registry): Extension<RunnerRegistry>) -> Json<Vec<RunnerInfoDto>> {
    let runners = registry
        .types()
        .into_iter()
        .filter_map(|task_type| registry.get(&task_type))
        .map(|runner| RunnerInfoDto {
            task_type: runner.task_type().to_string(),
            config_screen: runner.config_screen(""),
            float_screen: runner.float_screen(),
        })
        .collect();
    Json(runners)
}
