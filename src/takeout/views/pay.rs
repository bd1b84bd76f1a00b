//! 支付页与支付成功页

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::models::{Order, PayMethod, PaymentParams};
use crate::takeout::router::Route;
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct PayState {
    pub order_number: Option<String>,
    pub order: Option<Order>,
    pub pay_method: PayMethod,
    pub paying: bool,
    /// 支付成功的订单号，非空后延迟跳转成功页
    pub paid: Option<String>,
}

#[derive(Clone)]
pub struct PayView {
    ctx: ViewContext,
    state: Arc<Mutex<PayState>>,
}

impl PayView {
    pub fn new(ctx: ViewContext, order_number: Option<String>) -> Self {
        Self {
            ctx,
            state: Arc::new(Mutex::new(PayState {
                order_number,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> PayState {
        self.lock().clone()
    }

    /// 加载待支付订单，任何失败都提示后返回上一页
    pub async fn mount(&self) -> ClientResult<()> {
        let order_number = self.lock().order_number.clone();
        let Some(order_number) = order_number else {
            let result = self.ctx.reject("订单信息不存在").await;
            self.ctx.navigator.back();
            return result;
        };

        match self.ctx.api.order.detail(&order_number).await {
            Ok(order) => {
                let mut state = self.lock();
                if !order.number.is_empty() && order.number != order_number {
                    state.order_number = Some(order.number.clone());
                }
                state.order = Some(order);
                Ok(())
            }
            Err(ClientError::MissingData(_)) => {
                let result = self.ctx.reject("订单不存在").await;
                self.ctx.navigator.back();
                result
            }
            Err(e) => {
                let result = self.ctx.fail(e, "加载订单失败").await;
                self.ctx.navigator.back();
                result
            }
        }
    }

    pub fn set_pay_method(&self, method: PayMethod) {
        self.lock().pay_method = method;
    }

    /// 支付，成功后等待片刻跳转到成功页
    pub async fn pay(&self) -> ClientResult<()> {
        let (order_number, pay_method) = {
            let state = self.lock();
            (state.order_number.clone(), state.pay_method)
        };
        let Some(order_number) = order_number else {
            return self.ctx.reject("订单号不存在").await;
        };

        self.lock().paying = true;
        let result = self
            .ctx
            .api
            .order
            .payment(&PaymentParams {
                order_number: order_number.clone(),
                pay_method: pay_method.code(),
            })
            .await;
        self.lock().paying = false;

        match result {
            Ok(()) => {
                info!("[PayView] 💰 支付成功: {}", order_number);
                self.ctx.notices.success("支付成功").await;
                self.lock().paid = Some(order_number.clone());
                let delay = self.ctx.config.pay_redirect_delay;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.ctx.navigator.navigate_to(
                    Route::Success {
                        order_number: Some(order_number),
                    },
                    false,
                );
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "支付失败").await,
        }
    }
}

/// 支付成功页
#[derive(Clone)]
pub struct SuccessView {
    ctx: ViewContext,
    order_number: Option<String>,
}

impl SuccessView {
    pub fn new(ctx: ViewContext, order_number: Option<String>) -> Self {
        Self { ctx, order_number }
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn go_home(&self) {
        self.ctx.navigator.navigate_to(Route::Home, false);
    }

    /// 查看订单详情，没有订单号时不跳转
    pub fn view_order(&self) -> bool {
        match &self.order_number {
            Some(number) => {
                self.ctx.navigator.navigate_to(
                    Route::OrderDetail {
                        order_number: number.clone(),
                    },
                    false,
                );
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::takeout::client::Page;
    use crate::takeout::models::PayMethod;
    use crate::takeout::router::Route;
    use crate::takeout::test_support::{
        envelope, spawn_backend, test_client, RecordingNoticeListener,
    };
    use axum::extract::Path;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn backend(paid: Arc<Mutex<Option<Value>>>) -> Router {
        Router::new()
            .route(
                "/order/orderDetail/number/{number}",
                get(|Path(number): Path<String>| async move {
                    Json(envelope(json!({
                        "id": 1, "number": number, "status": 1, "amount": 36.0,
                        "orderDetailList": [{"id": 1, "name": "菜", "number": 2, "amount": 18.0}]
                    })))
                }),
            )
            .route(
                "/order/payment",
                put(move |Json(body): Json<Value>| {
                    let paid = paid.clone();
                    async move {
                        *paid.lock().unwrap() = Some(body);
                        Json(envelope(json!({"estimatedDeliveryTime": null})))
                    }
                }),
            )
    }

    async fn logged_in(
        path: &str,
    ) -> (Page, Arc<Mutex<Option<Value>>>, Arc<RecordingNoticeListener>) {
        let paid = Arc::new(Mutex::new(None));
        let base = spawn_backend(backend(paid.clone())).await;
        let (client, notices, _store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();
        (client.open(path).await, paid, notices)
    }

    #[tokio::test]
    async fn pay_with_alipay_then_lands_on_success() {
        let (page, paid, notices) = logged_in("/pay?orderNumber=1700000000001").await;
        let view = match page {
            Page::Pay(view) => view,
            other => panic!("unexpected page: {:?}", other.route()),
        };
        assert_eq!(view.state().order.unwrap().order_detail_list.len(), 1);

        view.set_pay_method(PayMethod::Alipay);
        view.pay().await.unwrap();

        let body = paid.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({"orderNumber": "1700000000001", "payMethod": 2}));
        assert_eq!(notices.successes(), vec!["支付成功".to_string()]);
        assert_eq!(
            view.ctx.navigator.current(),
            Route::Success {
                order_number: Some("1700000000001".to_string())
            }
        );
    }

    #[tokio::test]
    async fn missing_order_number_goes_back() {
        let (page, paid, notices) = logged_in("/pay").await;
        assert!(matches!(page, Page::Pay(_)));
        assert_eq!(notices.errors(), vec!["订单信息不存在".to_string()]);
        assert!(paid.lock().unwrap().is_none());
    }
}
