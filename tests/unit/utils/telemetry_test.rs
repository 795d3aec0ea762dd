// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use gamebot::config::settings::{LogFormat, LoggingSettings};
    use gamebot::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        let text = LoggingSettings {
            format: LogFormat::Text,
        };
        let json = LoggingSettings {
            format: LogFormat::Json,
        };
        telemetry::init_telemetry(&text);
        telemetry::init_telemetry(&json);

        tracing::debug!(task_id = 1, "Task moved");
        tracing::info!(removed = 2, "Tasks removed, undo available");
        tracing::warn!("Failed to publish task list");
    }
}
