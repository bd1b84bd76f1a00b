//! 历史订单列表（/history-order，“我的”页面也复用）

use crate::takeout::error::ClientResult;
use crate::takeout::models::{Order, OrderPageQuery};
use crate::takeout::pagination::Paginator;
use crate::takeout::router::Route;
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub struct HistoryOrderView {
    ctx: ViewContext,
    pager: Arc<Mutex<Paginator<Order>>>,
}

impl HistoryOrderView {
    pub fn new(ctx: ViewContext) -> Self {
        let page_size = ctx.config.page_size;
        Self {
            ctx,
            pager: Arc::new(Mutex::new(Paginator::new(page_size))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Paginator<Order>> {
        self.pager.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().items().to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn page(&self) -> u32 {
        self.lock().page()
    }

    pub async fn mount(&self) -> ClientResult<()> {
        self.refresh().await
    }

    /// 从第 1 页重新加载
    pub async fn refresh(&self) -> ClientResult<()> {
        self.lock().reset();
        self.load_more().await
    }

    /// 加载下一页；没有更多数据或正在加载时直接返回
    pub async fn load_more(&self) -> ClientResult<()> {
        let query = {
            let mut pager = self.lock();
            if !pager.can_load_more() {
                debug!("[HistoryView] 没有更多订单或正在加载");
                return Ok(());
            }
            pager.start_loading();
            OrderPageQuery {
                page: pager.next_page(),
                page_size: pager.page_size(),
            }
        };

        match self.ctx.api.order.history(query).await {
            Ok(page) => {
                self.lock().apply(query.page, page.records);
                Ok(())
            }
            Err(e) => {
                self.lock().fail();
                self.ctx.fail(e, "加载订单失败").await
            }
        }
    }

    /// 再来一单
    pub async fn repeat(&self, order_number: &str) -> ClientResult<()> {
        self.ctx.repeat_order(order_number).await
    }

    pub async fn remind(&self, order_number: &str) -> ClientResult<()> {
        self.ctx.remind_order(order_number).await
    }

    pub fn open_detail(&self, order_number: &str) {
        self.ctx.navigator.navigate_to(
            Route::OrderDetail {
                order_number: order_number.to_string(),
            },
            false,
        );
    }

    pub fn go_pay(&self, order_number: &str) {
        self.ctx.navigator.navigate_to(
            Route::Pay {
                order_number: Some(order_number.to_string()),
            },
            false,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::takeout::client::Page;
    use crate::takeout::config::ClientConfig;
    use crate::takeout::router::Route;
    use crate::takeout::test_support::{envelope, spawn_backend, test_client};
    use axum::extract::Query;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// 共 17 条订单，按 page / pageSize 切片
    fn order_backend(calls: Arc<Mutex<Vec<String>>>) -> Router {
        let history_calls = calls.clone();
        let clean_calls = calls.clone();
        Router::new()
            .route(
                "/order/historyOrders",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    let calls = history_calls.clone();
                    async move {
                        let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
                        let size: usize =
                            q.get("pageSize").and_then(|p| p.parse().ok()).unwrap_or(10);
                        calls.lock().unwrap().push(format!("history:{}:{}", page, size));
                        let records: Vec<Value> = (0..17usize)
                            .skip((page - 1) * size)
                            .take(size)
                            .map(|i| json!({"id": i, "number": format!("N{}", i), "status": 5, "amount": 10.0}))
                            .collect();
                        Json(envelope(json!({"total": 17, "records": records})))
                    }
                }),
            )
            .route(
                "/shoppingCart/clean",
                delete(move || {
                    let calls = clean_calls.clone();
                    async move {
                        calls.lock().unwrap().push("clean".to_string());
                        Json(envelope(Value::Null))
                    }
                }),
            )
            .route(
                "/order/repetition/number/{number}",
                post(move || {
                    let calls = calls.clone();
                    async move {
                        calls.lock().unwrap().push("repetition".to_string());
                        Json(envelope(Value::Null))
                    }
                }),
            )
    }

    #[tokio::test]
    async fn pages_append_until_short_page() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(order_backend(calls.clone())).await;
        let (client, _notices, _store) = test_client(&base).await;
        assert_eq!(ClientConfig::default().page_size, 10);
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();

        let Page::HistoryOrder(view) = client.open("/history-order").await else {
            panic!("expected history page");
        };
        assert_eq!(view.orders().len(), 10);
        assert!(view.has_more());

        view.load_more().await.unwrap();
        assert_eq!(view.orders().len(), 17);
        assert_eq!(view.orders()[10].number, "N10");
        assert!(!view.has_more());

        // 没有更多数据时不再请求
        view.load_more().await.unwrap();
        assert_eq!(
            calls.lock().unwrap().clone(),
            vec!["history:1:10".to_string(), "history:2:10".to_string()]
        );

        view.refresh().await.unwrap();
        assert_eq!(view.orders().len(), 10);
        assert_eq!(view.page(), 1);
    }

    #[tokio::test]
    async fn repeat_cleans_cart_first_then_goes_home() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(order_backend(calls.clone())).await;
        let (client, notices, _store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();
        let Page::HistoryOrder(view) = client.open("/history-order").await else {
            panic!("expected history page");
        };

        view.repeat("N3").await.unwrap();
        let calls = calls.lock().unwrap().clone();
        assert_eq!(&calls[1..], &["clean".to_string(), "repetition".to_string()]);
        assert_eq!(notices.successes(), vec!["已加入购物车".to_string()]);
        assert_eq!(client.navigator().current(), Route::Home);
    }
}
