//! 地址管理：列表页与新增 / 编辑表单页

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::models::{Address, AddressPayload};
use crate::takeout::router::Route;
use crate::takeout::validation::AddressForm;
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// ========== 地址列表 ==========

#[derive(Clone)]
pub struct AddressListView {
    ctx: ViewContext,
    addresses: Arc<Mutex<Vec<Address>>>,
}

impl AddressListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            addresses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Address>> {
        self.addresses.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.lock().clone()
    }

    pub async fn mount(&self) -> ClientResult<()> {
        self.reload().await
    }

    pub async fn reload(&self) -> ClientResult<()> {
        match self.ctx.api.address.list().await {
            Ok(list) => {
                *self.lock() = list;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "加载地址失败").await,
        }
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        match self.ctx.api.address.delete(id).await {
            Ok(()) => {
                self.ctx.notices.success("删除成功").await;
                self.reload().await
            }
            Err(e) => self.ctx.fail(e, "删除失败").await,
        }
    }

    pub async fn set_default(&self, id: &str) -> ClientResult<()> {
        match self.ctx.api.address.set_default(id).await {
            Ok(()) => {
                self.ctx.notices.success("设置成功").await;
                self.reload().await
            }
            Err(e) => self.ctx.fail(e, "设置失败").await,
        }
    }

    pub fn add(&self) {
        self.ctx.navigator.navigate_to(Route::AddressAdd, false);
    }

    pub fn edit(&self, id: &str) {
        self.ctx
            .navigator
            .navigate_to(Route::AddressEdit { id: id.to_string() }, false);
    }
}

// ========== 新增 / 编辑 ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFormMode {
    Add,
    Edit { id: String },
}

#[derive(Clone)]
pub struct AddressFormView {
    ctx: ViewContext,
    mode: AddressFormMode,
    /// 编辑模式下加载到的原地址，保存时沿用它的省市区
    current: Arc<Mutex<Option<Address>>>,
}

impl AddressFormView {
    pub fn new(ctx: ViewContext, mode: AddressFormMode) -> Self {
        Self {
            ctx,
            mode,
            current: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Address>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn mode(&self) -> &AddressFormMode {
        &self.mode
    }

    /// 编辑模式下回显的表单
    pub fn form(&self) -> AddressForm {
        match self.lock().as_ref() {
            Some(address) => AddressForm {
                consignee: address.consignee.clone(),
                phone: address.phone.clone(),
                sex: if address.sex.is_empty() {
                    "1".to_string()
                } else {
                    address.sex.clone()
                },
                detail: address.detail.clone(),
                label: address.label.clone(),
            },
            None => AddressForm::default(),
        }
    }

    /// 编辑模式加载原地址，失败时提示并返回上一页
    pub async fn mount(&self) -> ClientResult<()> {
        let AddressFormMode::Edit { id } = &self.mode else {
            return Ok(());
        };
        match self.ctx.api.address.get(id).await {
            Ok(address) => {
                *self.lock() = Some(address);
                Ok(())
            }
            Err(ClientError::MissingData(_)) => {
                let result = self.ctx.reject("地址不存在").await;
                self.ctx.navigator.back();
                result
            }
            Err(e) => {
                let result = self.ctx.fail(e, "加载地址失败").await;
                self.ctx.navigator.back();
                result
            }
        }
    }

    /// 保存。新增时省市区为空，编辑时沿用原地址的编码和名称
    pub async fn save(&self, form: &AddressForm) -> ClientResult<()> {
        if let Err(e) = form.validate() {
            let message = e.to_string();
            return self.ctx.fail(e, &message).await;
        }

        let mut payload = AddressPayload {
            id: None,
            consignee: form.consignee.trim().to_string(),
            phone: form.phone.trim().to_string(),
            sex: form.sex.clone(),
            detail: form.detail.trim().to_string(),
            label: form.label.clone(),
            ..Default::default()
        };

        let (result, success, fallback) = match &self.mode {
            AddressFormMode::Edit { id } => {
                let current = self.lock().clone();
                let Some(current) = current else {
                    return self.ctx.reject("地址信息加载失败，请刷新后重试").await;
                };
                payload.id = Some(id.clone());
                payload.province_code = current.province_code;
                payload.province_name = current.province_name;
                payload.city_code = current.city_code;
                payload.city_name = current.city_name;
                payload.district_code = current.district_code;
                payload.district_name = current.district_name;
                (
                    self.ctx.api.address.update(&payload).await,
                    "修改成功",
                    "修改失败",
                )
            }
            AddressFormMode::Add => (
                self.ctx.api.address.add(&payload).await,
                "添加成功",
                "添加失败",
            ),
        };

        match result {
            Ok(()) => {
                info!("[AddressForm] ✅ {}: {}", success, payload.consignee);
                self.ctx.notices.success(success).await;
                self.ctx.navigator.back();
                Ok(())
            }
            Err(e) => self.ctx.fail(e, fallback).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::takeout::client::{Page, TakeoutClient};
    use crate::takeout::router::Route;
    use crate::takeout::test_support::{envelope, spawn_backend, test_client};
    use crate::takeout::validation::AddressForm;
    use axum::extract::Path;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn backend(saved: Arc<Mutex<Vec<(String, Value)>>>) -> Router {
        let on_add = saved.clone();
        Router::new()
            .route(
                "/addressBook/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(envelope(json!({
                        "id": id, "consignee": "李四", "phone": "13912345678", "sex": "0",
                        "provinceCode": "33", "provinceName": "浙江省",
                        "cityCode": "3301", "cityName": "杭州市",
                        "districtCode": "330106", "districtName": "西湖区",
                        "detail": "文三路", "label": "公司", "isDefault": 1
                    })))
                }),
            )
            .route(
                "/addressBook",
                post(move |Json(body): Json<Value>| {
                    let saved = on_add.clone();
                    async move {
                        saved.lock().unwrap().push(("add".to_string(), body));
                        Json(envelope(Value::Null))
                    }
                })
                .put(move |Json(body): Json<Value>| {
                    let saved = saved.clone();
                    async move {
                        saved.lock().unwrap().push(("update".to_string(), body));
                        Json(envelope(Value::Null))
                    }
                }),
            )
    }

    async fn open(path: &str) -> (Page, Arc<Mutex<Vec<(String, Value)>>>, TakeoutClient) {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(backend(saved.clone())).await;
        let (client, _notices, _store) = test_client(&base).await;
        client
            .session()
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();
        client.navigator().navigate("/address", false);
        (client.open(path).await, saved, client)
    }

    #[tokio::test]
    async fn edit_keeps_region_fields() {
        let (page, saved, client) = open("/address/edit/7").await;
        let Page::AddressForm(view) = page else {
            panic!("expected address form");
        };
        let mut form = view.form();
        assert_eq!(form.consignee, "李四");
        form.detail = "文一路".to_string();
        view.save(&form).await.unwrap();

        let saved = saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        let (kind, body) = &saved[0];
        assert_eq!(kind, "update");
        assert_eq!(body["id"], "7");
        assert_eq!(body["provinceCode"], "33");
        assert_eq!(body["districtName"], "西湖区");
        assert_eq!(body["detail"], "文一路");
        // 保存后返回列表页
        assert_eq!(client.navigator().current(), Route::AddressList);
    }

    #[tokio::test]
    async fn add_sends_empty_region_and_validates_first() {
        let (page, saved, _client) = open("/address/add").await;
        let Page::AddressForm(view) = page else {
            panic!("expected address form");
        };

        let mut form = AddressForm {
            consignee: "王五".to_string(),
            phone: "123".to_string(),
            detail: "1 号".to_string(),
            ..Default::default()
        };
        let err = view.save(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "请输入正确的手机号");
        assert!(saved.lock().unwrap().is_empty());

        form.phone = "13712345678".to_string();
        view.save(&form).await.unwrap();
        let saved = saved.lock().unwrap().clone();
        let (kind, body) = &saved[0];
        assert_eq!(kind, "add");
        assert!(body.get("id").is_none());
        assert_eq!(body["provinceCode"], "");
        assert_eq!(body["cityName"], "");
        assert_eq!(body["sex"], "1");
    }
}
