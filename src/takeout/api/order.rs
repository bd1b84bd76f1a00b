//! 订单 API

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::http::HttpClient;
use crate::takeout::models::{
    Order, OrderPage, OrderPageQuery, PaymentParams, SubmitOrderParams, SubmitOrderResult,
};
use serde::de::IgnoredAny;
use tracing::info;

#[derive(Clone)]
pub struct OrderApi {
    http: HttpClient,
}

impl OrderApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 提交订单
    pub async fn submit(&self, params: &SubmitOrderParams) -> ClientResult<SubmitOrderResult> {
        info!(
            "[OrderAPI] 🧾 提交订单，地址ID: {}, 金额: {:.2}",
            params.address_book_id, params.amount
        );
        Ok(self
            .http
            .post("/order/submit", params)
            .await?
            .unwrap_or_default())
    }

    /// 支付订单
    pub async fn payment(&self, params: &PaymentParams) -> ClientResult<()> {
        info!("[OrderAPI] 💰 支付订单: {}", params.order_number);
        self.http
            .put::<IgnoredAny, _>("/order/payment", params)
            .await?;
        Ok(())
    }

    /// 历史订单分页
    pub async fn history(&self, query: OrderPageQuery) -> ClientResult<OrderPage> {
        Ok(self
            .http
            .get_query("/order/historyOrders", &query)
            .await?
            .unwrap_or_default())
    }

    pub async fn detail(&self, order_number: &str) -> ClientResult<Order> {
        self.http
            .get(&format!("/order/orderDetail/number/{}", order_number))
            .await?
            .ok_or(ClientError::MissingData("订单详情"))
    }

    /// 再来一单：把订单中的商品重新加入购物车
    pub async fn repetition(&self, order_number: &str) -> ClientResult<()> {
        self.http
            .post_empty::<IgnoredAny>(&format!("/order/repetition/number/{}", order_number))
            .await?;
        Ok(())
    }

    /// 催单
    pub async fn reminder(&self, order_number: &str) -> ClientResult<()> {
        self.http
            .get::<IgnoredAny>(&format!("/order/reminder/number/{}", order_number))
            .await?;
        Ok(())
    }

    pub async fn cancel(&self, order_number: &str) -> ClientResult<()> {
        self.http
            .put_empty::<IgnoredAny>(&format!("/order/cancel/number/{}", order_number))
            .await?;
        Ok(())
    }
}
