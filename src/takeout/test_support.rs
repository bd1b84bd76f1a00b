//! 测试辅助：日志初始化、进程内 mock 后端、记录提示的监听器

use crate::takeout::client::TakeoutClient;
use crate::takeout::config::ClientConfig;
use crate::takeout::listener::NoticeListener;
use crate::takeout::session::{MemorySessionStore, SessionStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        // 测试中默认打开当前 crate 的 debug，关闭底层 HTTP 客户端的 debug 噪音
        let filter_layer = EnvFilter::new(
            "info,sky_takeout_client=debug,hyper_util::client=info,reqwest=info",
        );

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    });
}

/// 在随机端口启动 mock 后端，返回基础地址
pub(crate) async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind tcp listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock backend");
    });
    format!("http://{}", addr)
}

/// 成功信封
pub(crate) fn envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "code": 1, "msg": null, "data": data })
}

/// 记录所有提示，便于断言
#[derive(Default)]
pub(crate) struct RecordingNoticeListener {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNoticeListener {
    pub(crate) fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("lock").clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("lock").clone()
    }
}

#[async_trait]
impl NoticeListener for RecordingNoticeListener {
    async fn on_success(&self, message: String) {
        self.successes.lock().expect("lock").push(message);
    }

    async fn on_error(&self, message: String) {
        self.errors.lock().expect("lock").push(message);
    }
}

/// 连接 mock 后端的客户端（内存存储、无跳转延迟）
pub(crate) async fn test_client(
    base_url: &str,
) -> (TakeoutClient, Arc<RecordingNoticeListener>, Arc<dyn SessionStore>) {
    init_test_logger();
    let config = ClientConfig::new(base_url)
        .with_timeout(Duration::from_secs(2))
        .with_redirect_delay(Duration::ZERO);
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let notices = Arc::new(RecordingNoticeListener::default());
    let mut client = TakeoutClient::with_store(config, store.clone())
        .await
        .expect("create client");
    client.set_notice_listener(notices.clone());
    (client, notices, store)
}

/// 等待条件成立（后台任务处理事件需要时间）
pub(crate) async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..50 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
