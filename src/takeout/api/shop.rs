use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::models::ShopStatus;

#[derive(Clone)]
pub struct ShopApi {
    http: HttpClient,
}

impl ShopApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 店铺营业状态，data 缺失或不是数字时视为营业中
    pub async fn status(&self) -> ClientResult<ShopStatus> {
        let data: Option<serde_json::Value> = self.http.get("/shop/status").await?;
        Ok(data
            .and_then(|v| v.as_i64())
            .map(ShopStatus::from_code)
            .unwrap_or_default())
    }
}
