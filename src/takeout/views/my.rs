//! “我的”页面：用户信息、最近订单、退出登录

use crate::takeout::error::ClientResult;
use crate::takeout::format::mask_phone;
use crate::takeout::models::UserInfo;
use crate::takeout::router::Route;
use crate::takeout::views::{HistoryOrderView, ViewContext};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub struct MyView {
    ctx: ViewContext,
    user: Arc<Mutex<Option<UserInfo>>>,
    orders: HistoryOrderView,
}

impl MyView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            orders: HistoryOrderView::new(ctx.clone()),
            ctx,
            user: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<UserInfo>> {
        self.user.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.lock().clone()
    }

    /// 脱敏后的手机号
    pub fn masked_phone(&self) -> Option<String> {
        self.lock().as_ref().map(|user| mask_phone(&user.phone))
    }

    /// 最近订单（分页）
    pub fn orders(&self) -> &HistoryOrderView {
        &self.orders
    }

    pub async fn mount(&self) -> ClientResult<()> {
        if !self.ctx.has_token() {
            self.ctx.navigator.navigate_to(Route::Login, true);
            return Err(self.ctx.login_required());
        }
        let (user, orders) = tokio::join!(self.load_user(), self.orders.refresh());
        user.and(orders)
    }

    /// 加载用户信息；401 已由会话失效流程提示，这里不重复提示
    pub async fn load_user(&self) -> ClientResult<()> {
        match self.ctx.api.auth.user_info().await {
            Ok(user) => {
                *self.lock() = Some(user);
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                debug!("[MyView] 获取用户信息 401: {}", e);
                *self.lock() = None;
                Err(e)
            }
            Err(e) => {
                *self.lock() = None;
                self.ctx.fail(e, "获取用户信息失败").await
            }
        }
    }

    pub fn go_address(&self) {
        self.ctx.navigator.navigate_to(Route::AddressList, false);
    }

    pub fn go_history(&self) {
        self.ctx.navigator.navigate_to(Route::HistoryOrder, false);
    }

    /// 退出登录
    pub async fn logout(&self) -> ClientResult<()> {
        self.ctx.session.logout().await?;
        info!("[MyView] 👋 退出登录");
        self.ctx.notices.success("已退出登录").await;
        self.ctx.navigator.navigate_to(Route::Login, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::takeout::client::Page;
    use crate::takeout::router::Route;
    use crate::takeout::session::TOKEN_KEY;
    use crate::takeout::test_support::{envelope, spawn_backend, test_client};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn guard_keeps_my_page_unmounted_without_token() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/user/info",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(envelope(json!({"id": 1, "phone": "13812345678"})))
                }
            }),
        );
        let base = spawn_backend(router).await;
        let (client, _notices, _store) = test_client(&base).await;

        let page = client.open("/my").await;
        assert!(matches!(page, Page::Login(_)));
        assert_eq!(client.navigator().current(), Route::Login);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn loads_user_and_masks_phone_then_logs_out() {
        let router = Router::new()
            .route(
                "/user/info",
                get(|| async { Json(envelope(json!({"id": 1, "phone": "13812345678"}))) }),
            )
            .route(
                "/order/historyOrders",
                get(|| async { Json(envelope(json!({"total": 0, "records": []}))) }),
            );
        let base = spawn_backend(router).await;
        let (client, notices, store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();

        let Page::My(view) = client.open("/my").await else {
            panic!("expected my page");
        };
        assert_eq!(view.masked_phone().as_deref(), Some("138****5678"));
        assert!(view.orders().orders().is_empty());
        assert!(!view.orders().has_more());

        view.logout().await.unwrap();
        assert_eq!(store.get_item(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(notices.successes(), vec!["已退出登录".to_string()]);
        assert_eq!(client.navigator().current(), Route::Login);
    }

    #[tokio::test]
    async fn expired_session_on_my_page_redirects_once_without_extra_notice() {
        let router = Router::new()
            .route("/user/info", get(|| async { StatusCode::UNAUTHORIZED }))
            .route(
                "/order/historyOrders",
                get(|| async { StatusCode::UNAUTHORIZED }),
            );
        let base = spawn_backend(router).await;
        let (client, notices, store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();

        let page = client.open("/my").await;
        assert!(matches!(page, Page::My(_)));
        let navigator = client.navigator().clone();
        assert!(
            crate::takeout::test_support::eventually(|| navigator.current() == Route::Login)
                .await
        );

        assert_eq!(store.get_item(TOKEN_KEY).await.unwrap(), None);
        let redirects = client
            .navigator()
            .log()
            .into_iter()
            .filter(|entry| entry.route == Route::Login)
            .count();
        assert_eq!(redirects, 1);
        // 用户信息的 401 不额外提示；订单列表的提示是“登录已过期”，会话失效任务提示“请先登录”
        let errors = notices.errors();
        assert_eq!(errors.iter().filter(|m| *m == "请先登录").count(), 1);
        assert!(!errors.iter().any(|m| m == "获取用户信息失败"));
    }
}
