// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// 执行端会话
///
/// 执行端连接时创建，持有一个可选的断开回调。`disconnect` 只会触发
/// 一次回调，之后的调用是空操作。
pub struct ServiceSession {
    id: Uuid,
    on_disconnect: Mutex<Option<Cleanup>>,
}

impl ServiceSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, "Service session connected");
        Self {
            id,
            on_disconnect: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 设置断开回调，替换之前设置的回调
    pub fn on_disconnect<F>(&self, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.on_disconnect.lock() = Some(Box::new(cleanup));
    }

    /// 是否还有未触发的断开回调
    pub fn has_cleanup(&self) -> bool {
        self.on_disconnect.lock().is_some()
    }

    /// 断开会话并触发回调
    ///
    /// # 返回值
    ///
    /// 本次调用是否触发了回调
    pub fn disconnect(&self) -> bool {
        let cleanup = self.on_disconnect.lock().take();
        match cleanup {
            Some(cleanup) => {
                cleanup();
                info!(session_id = %self.id, "Service session disconnected");
                true
            }
            None => {
                debug!(session_id = %self.id, "Service session already disconnected");
                false
            }
        }
    }
}

impl Default for ServiceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSession")
            .field("id", &self.id)
            .field("has_cleanup", &self.has_cleanup())
            .finish()
    }
}
