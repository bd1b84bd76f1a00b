//! 地址簿 API

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::http::HttpClient;
use crate::takeout::models::{Address, AddressPayload};
use serde::de::IgnoredAny;

#[derive(Clone)]
pub struct AddressApi {
    http: HttpClient,
}

impl AddressApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ClientResult<Vec<Address>> {
        Ok(self
            .http
            .get("/addressBook/list")
            .await?
            .unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> ClientResult<Address> {
        self.http
            .get(&format!("/addressBook/{}", id))
            .await?
            .ok_or(ClientError::MissingData("地址详情"))
    }

    pub async fn add(&self, payload: &AddressPayload) -> ClientResult<()> {
        self.http
            .post::<IgnoredAny, _>("/addressBook", payload)
            .await?;
        Ok(())
    }

    pub async fn update(&self, payload: &AddressPayload) -> ClientResult<()> {
        self.http
            .put::<IgnoredAny, _>("/addressBook", payload)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete_query::<IgnoredAny, _>("/addressBook", &[("id", id)])
            .await?;
        Ok(())
    }

    /// 默认地址，没有设置时返回 None
    pub async fn default_address(&self) -> ClientResult<Option<Address>> {
        self.http.get("/addressBook/default").await
    }

    pub async fn set_default(&self, id: &str) -> ClientResult<()> {
        self.http
            .put::<IgnoredAny, _>("/addressBook/default", &serde_json::json!({ "id": id }))
            .await?;
        Ok(())
    }
}
