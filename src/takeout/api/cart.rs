//! 购物车 API

use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::models::{CartItem, CartParams};
use serde::de::IgnoredAny;
use tracing::info;

#[derive(Clone)]
pub struct CartApi {
    http: HttpClient,
}

impl CartApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 加入购物车（数量 +1）
    pub async fn add(&self, params: &CartParams) -> ClientResult<()> {
        info!("[CartAPI] ➕ {:?}", params);
        self.http
            .post::<IgnoredAny, _>("/shoppingCart/add", params)
            .await?;
        Ok(())
    }

    /// 数量 -1，减到 0 时后端删除条目
    pub async fn sub(&self, params: &CartParams) -> ClientResult<()> {
        info!("[CartAPI] ➖ {:?}", params);
        self.http
            .post::<IgnoredAny, _>("/shoppingCart/sub", params)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> ClientResult<Vec<CartItem>> {
        Ok(self
            .http
            .get("/shoppingCart/list")
            .await?
            .unwrap_or_default())
    }

    /// 清空购物车
    pub async fn clean(&self) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>("/shoppingCart/clean")
            .await?;
        Ok(())
    }
}
