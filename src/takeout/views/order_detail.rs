//! 订单详情页

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::models::Order;
use crate::takeout::router::Route;
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct OrderDetailView {
    ctx: ViewContext,
    order_number: String,
    order: Arc<Mutex<Option<Order>>>,
}

impl OrderDetailView {
    pub fn new(ctx: ViewContext, order_number: String) -> Self {
        Self {
            ctx,
            order_number,
            order: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Order>> {
        self.order.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn order(&self) -> Option<Order> {
        self.lock().clone()
    }

    pub async fn mount(&self) -> ClientResult<()> {
        self.reload().await
    }

    pub async fn reload(&self) -> ClientResult<()> {
        match self.ctx.api.order.detail(&self.order_number).await {
            Ok(order) => {
                *self.lock() = Some(order);
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "加载订单详情失败").await,
        }
    }

    /// 当前订单号（以加载到的订单为准）
    fn current_number(&self) -> Option<String> {
        self.lock().as_ref().map(|order| order.number.clone())
    }

    /// 订单未加载成功时不能操作（加载失败已提示过）
    fn loaded_number(&self) -> ClientResult<String> {
        self.current_number()
            .ok_or(ClientError::MissingData("订单数据"))
    }

    pub async fn remind(&self) -> ClientResult<()> {
        let number = self.loaded_number()?;
        self.ctx.remind_order(&number).await
    }

    /// 取消订单，成功后重新加载
    pub async fn cancel(&self) -> ClientResult<()> {
        let number = self.loaded_number()?;
        match self.ctx.api.order.cancel(&number).await {
            Ok(()) => {
                self.ctx.notices.success("订单已取消").await;
                self.reload().await
            }
            Err(e) => self.ctx.fail(e, "取消失败").await,
        }
    }

    pub async fn repeat(&self) -> ClientResult<()> {
        let number = self.loaded_number()?;
        self.ctx.repeat_order(&number).await
    }

    /// 待付款订单去支付
    pub fn go_pay(&self) {
        if let Some(number) = self.current_number() {
            self.ctx.navigator.navigate_to(
                Route::Pay {
                    order_number: Some(number),
                },
                false,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::takeout::client::Page;
    use crate::takeout::error::ClientError;
    use crate::takeout::models::OrderStatus;
    use crate::takeout::test_support::{envelope, spawn_backend, test_client};
    use axum::extract::Path;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancel_reloads_order_status() {
        let status = Arc::new(AtomicI32::new(2));
        let detail_status = status.clone();
        let router = Router::new()
            .route(
                "/order/orderDetail/number/{number}",
                get(move |Path(number): Path<String>| {
                    let status = detail_status.clone();
                    async move {
                        Json(envelope(json!({
                            "id": 1, "number": number,
                            "status": status.load(Ordering::SeqCst), "amount": 20.0
                        })))
                    }
                }),
            )
            .route(
                "/order/cancel/number/{number}",
                put(move || {
                    let status = status.clone();
                    async move {
                        status.store(6, Ordering::SeqCst);
                        Json(envelope(Value::Null))
                    }
                }),
            )
            .route(
                "/order/reminder/number/{number}",
                get(|| async { Json(envelope(Value::Null)) }),
            );
        let base = spawn_backend(router).await;
        let (client, notices, _store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();

        let Page::OrderDetail(view) = client.open("/order/detail/1700000000009").await else {
            panic!("expected order detail page");
        };
        assert_eq!(view.order().unwrap().status(), OrderStatus::AwaitingAcceptance);

        view.remind().await.unwrap();
        view.cancel().await.unwrap();
        assert_eq!(view.order().unwrap().status(), OrderStatus::Cancelled);
        assert_eq!(
            notices.successes(),
            vec!["催单成功".to_string(), "订单已取消".to_string()]
        );
    }

    #[tokio::test]
    async fn actions_fail_when_order_did_not_load() {
        let reminders = Arc::new(AtomicI32::new(0));
        let counter = reminders.clone();
        let router = Router::new()
            .route(
                "/order/orderDetail/number/{number}",
                get(|| async { Json(json!({"code": 0, "msg": "订单不存在", "data": null})) }),
            )
            .route(
                "/order/reminder/number/{number}",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Json(envelope(Value::Null))
                    }
                }),
            );
        let base = spawn_backend(router).await;
        let (client, notices, _store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();

        let Page::OrderDetail(view) = client.open("/order/detail/404").await else {
            panic!("expected order detail page");
        };
        assert!(view.order().is_none());
        assert_eq!(notices.errors(), vec!["订单不存在".to_string()]);

        assert!(matches!(view.remind().await, Err(ClientError::MissingData(_))));
        assert!(view.cancel().await.is_err());
        assert!(view.repeat().await.is_err());
        assert_eq!(reminders.load(Ordering::SeqCst), 0);
        assert_eq!(notices.errors().len(), 1);
    }
}
