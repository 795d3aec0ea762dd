// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志
///
/// 默认过滤规则为 `info,gamebot=debug`，可通过 `RUST_LOG` 覆盖。
/// 输出格式由 `logging.format` 决定。重复调用时保留已安装的订阅者。
pub fn init_telemetry(settings: &LoggingSettings) {
    let json = (settings.format == LogFormat::Json).then(|| fmt::layer().json());
    let text = (settings.format == LogFormat::Text).then(fmt::layer);

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gamebot=debug".into()),
        )
        .with(json)
        .with(text)
        .try_init();
}
