//! 提示监听器回调接口
//!
//! 所有页面操作的结果都通过它告知调用方（相当于界面上的 toast）。

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// 提示监听器
#[async_trait]
pub trait NoticeListener: Send + Sync {
    /// 操作成功提示，例如 "已加入购物车"
    async fn on_success(&self, message: String);

    /// 错误提示，例如 "网络异常"
    async fn on_error(&self, message: String);
}

/// 默认空实现（无操作）
pub struct EmptyNoticeListener;

#[async_trait]
impl NoticeListener for EmptyNoticeListener {
    async fn on_success(&self, _message: String) {}
    async fn on_error(&self, _message: String) {}
}

/// 可替换的提示分发器
///
/// 视图和跳转任务持有同一个分发器，客户端替换监听器后立即对所有持有方生效。
pub struct NoticeHub {
    listener: RwLock<Arc<dyn NoticeListener>>,
}

impl NoticeHub {
    pub fn new(listener: Arc<dyn NoticeListener>) -> Self {
        Self {
            listener: RwLock::new(listener),
        }
    }

    /// 替换监听器
    pub fn set_listener(&self, listener: Arc<dyn NoticeListener>) {
        *self.listener.write().unwrap_or_else(|e| e.into_inner()) = listener;
    }

    fn current(&self) -> Arc<dyn NoticeListener> {
        self.listener
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.current().on_success(message.into()).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.current().on_error(message.into()).await;
    }
}

impl Default for NoticeHub {
    fn default() -> Self {
        Self::new(Arc::new(EmptyNoticeListener))
    }
}
