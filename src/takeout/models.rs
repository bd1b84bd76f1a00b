//! 业务数据模型
//!
//! 与后端 JSON 一一对应（camelCase），缺失字段使用默认值。
//! `dish_number` / `setmeal_number` 是客户端字段，表示当前购物车中的数量。

use crate::takeout::types::{
    deserialize_id, deserialize_null_default, deserialize_optional_id, deserialize_vec_or_null,
};
use serde::{Deserialize, Serialize};

// ========== 用户 ==========

/// 手机号登录请求
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub token: String,
}

/// 当前用户信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub phone: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub id_number: Option<String>,
}

// ========== 分类 ==========

/// 分类类型：1 菜品分类，2 套餐分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Dish,
    Setmeal,
}

impl CategoryKind {
    pub fn code(self) -> i32 {
        match self {
            CategoryKind::Dish => 1,
            CategoryKind::Setmeal => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(CategoryKind::Dish),
            2 => Some(CategoryKind::Setmeal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "deserialize_null_default")]
    pub category_type: i32,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub sort: i32,
    pub status: Option<i32>,
}

impl Category {
    pub fn kind(&self) -> Option<CategoryKind> {
        CategoryKind::from_code(self.category_type)
    }
}

// ========== 菜品 / 套餐 ==========

/// 菜品口味。`value` 可能是字符串数组，也可能是 JSON 编码后的字符串或逗号分隔的字符串
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DishFlavor {
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dish {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub category_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub price: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub image: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub description: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub status: i32,
    #[serde(deserialize_with = "deserialize_vec_or_null")]
    pub flavors: Vec<DishFlavor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dish_number: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Setmeal {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub category_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub price: f64,
    /// 0 停用，1 启用
    #[serde(deserialize_with = "deserialize_null_default")]
    pub status: i32,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub description: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setmeal_number: Option<i32>,
}

/// 套餐包含的菜品
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetmealDishItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub copies: i32,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub image: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub description: String,
}

// ========== 购物车 ==========

/// 购物车条目，`dish_id` 与 `setmeal_id` 只有一个有值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub image: String,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub dish_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub setmeal_id: Option<String>,
    pub dish_flavor: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub number: i32,
    /// 单价
    #[serde(deserialize_with = "deserialize_null_default")]
    pub amount: f64,
}

/// 购物车加减参数
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setmeal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dish_flavor: Option<String>,
}

impl CartParams {
    /// 菜品条目总是带 dishFlavor，没有口味时为空串
    pub fn dish(dish_id: impl Into<String>, flavor: Option<&str>) -> Self {
        Self {
            dish_id: Some(dish_id.into()),
            setmeal_id: None,
            dish_flavor: Some(flavor.unwrap_or_default().to_string()),
        }
    }

    /// 套餐条目只有非空口味时才带 dishFlavor
    pub fn setmeal(setmeal_id: impl Into<String>, flavor: Option<&str>) -> Self {
        Self {
            dish_id: None,
            setmeal_id: Some(setmeal_id.into()),
            dish_flavor: flavor.filter(|f| !f.is_empty()).map(str::to_string),
        }
    }

    /// 按购物车已有条目构造加减参数
    pub fn for_item(item: &CartItem) -> Self {
        match &item.setmeal_id {
            Some(setmeal_id) => Self::setmeal(setmeal_id.clone(), item.dish_flavor.as_deref()),
            None => Self::dish(
                item.dish_id.clone().unwrap_or_default(),
                item.dish_flavor.as_deref(),
            ),
        }
    }
}

// ========== 地址 ==========

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub consignee: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub phone: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub sex: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub province_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub province_name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub city_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub city_name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub district_code: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub district_name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub detail: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub label: String,
    /// 1 为默认地址
    #[serde(deserialize_with = "deserialize_null_default")]
    pub is_default: i32,
}

impl Address {
    pub fn is_default(&self) -> bool {
        self.is_default == 1
    }
}

/// 新增 / 修改地址的请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub consignee: String,
    pub phone: String,
    pub sex: String,
    pub detail: String,
    pub label: String,
    pub province_code: String,
    pub province_name: String,
    pub city_code: String,
    pub city_name: String,
    pub district_code: String,
    pub district_name: String,
}

// ========== 订单 ==========

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingPayment,
    AwaitingAcceptance,
    Accepted,
    Delivering,
    Completed,
    Cancelled,
    Refunded,
    Unknown,
}

impl OrderStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => OrderStatus::PendingPayment,
            2 => OrderStatus::AwaitingAcceptance,
            3 => OrderStatus::Accepted,
            4 => OrderStatus::Delivering,
            5 => OrderStatus::Completed,
            6 => OrderStatus::Cancelled,
            7 => OrderStatus::Refunded,
            _ => OrderStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "待付款",
            OrderStatus::AwaitingAcceptance => "待接单",
            OrderStatus::Accepted => "已接单",
            OrderStatus::Delivering => "派送中",
            OrderStatus::Completed => "已完成",
            OrderStatus::Cancelled => "已取消",
            OrderStatus::Refunded => "退款",
            OrderStatus::Unknown => "未知",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub image: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub order_id: String,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub dish_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub setmeal_id: Option<String>,
    pub dish_flavor: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub number: i32,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub number: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub status: i32,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub address_book_id: String,
    pub order_time: Option<String>,
    pub checkout_time: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub pay_method: i32,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub amount: f64,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub phone: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub address: String,
    pub user_name: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub consignee: String,
    #[serde(deserialize_with = "deserialize_vec_or_null")]
    pub order_detail_list: Vec<OrderDetail>,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_code(self.status)
    }
}

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayMethod {
    #[default]
    WeChat,
    Alipay,
}

impl PayMethod {
    pub fn code(self) -> i32 {
        match self {
            PayMethod::WeChat => 1,
            PayMethod::Alipay => 2,
        }
    }
}

/// 提交订单参数
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderParams {
    pub address_book_id: String,
    pub pay_method: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<String>,
    pub delivery_status: i32,
    pub tableware_number: i32,
    pub tableware_status: i32,
    pub pack_amount: i32,
    pub amount: f64,
}

/// 提交订单返回
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitOrderResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub order_number: String,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub order_amount: f64,
    pub order_time: Option<String>,
}

/// 支付订单参数
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    pub order_number: String,
    pub pay_method: i32,
}

/// 订单分页查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPageQuery {
    pub page: u32,
    pub page_size: u32,
}

/// 订单分页数据
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderPage {
    #[serde(deserialize_with = "deserialize_vec_or_null")]
    pub records: Vec<Order>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub total: i64,
}

// ========== 店铺 ==========

/// 店铺营业状态：1 营业中，0 休息中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShopStatus {
    #[default]
    Open,
    Closed,
}

impl ShopStatus {
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            ShopStatus::Open
        } else {
            ShopStatus::Closed
        }
    }

    pub fn is_open(self) -> bool {
        self == ShopStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dish_cart_params_always_carry_flavor() {
        let params = CartParams::dish("11", None);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"dishId": "11", "dishFlavor": ""})
        );
    }

    #[test]
    fn setmeal_cart_params_omit_empty_flavor() {
        let params = CartParams::setmeal("21", Some(""));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"setmealId": "21"})
        );
        let params = CartParams::setmeal("21", Some("少冰"));
        assert_eq!(params.dish_flavor.as_deref(), Some("少冰"));
    }

    #[test]
    fn cart_item_tolerates_null_ids() {
        let item: CartItem = serde_json::from_value(json!({
            "id": 3, "name": "套餐A", "dishId": null, "setmealId": 21,
            "dishFlavor": null, "number": 2, "amount": 30.5
        }))
        .unwrap();
        assert_eq!(item.dish_id, None);
        assert_eq!(item.setmeal_id.as_deref(), Some("21"));
        assert_eq!(CartParams::for_item(&item), CartParams::setmeal("21", None));
    }

    #[test]
    fn order_status_labels() {
        assert_eq!(OrderStatus::from_code(1).label(), "待付款");
        assert_eq!(OrderStatus::from_code(6).label(), "已取消");
        assert_eq!(OrderStatus::from_code(42).label(), "未知");
    }

    #[test]
    fn category_kind_from_type() {
        let c: Category =
            serde_json::from_value(json!({"id": "5", "type": 2, "name": "套餐", "sort": 3}))
                .unwrap();
        assert_eq!(c.kind(), Some(CategoryKind::Setmeal));
    }

    #[test]
    fn records_with_null_columns_still_decode() {
        let addresses: Vec<Address> = serde_json::from_value(json!([{
            "id": 1, "userId": 4, "consignee": "张三", "phone": "13812345678", "sex": "1",
            "provinceCode": null, "provinceName": null, "cityCode": null, "cityName": null,
            "districtCode": null, "districtName": null, "detail": "文三路 1 号",
            "label": null, "isDefault": null
        }]))
        .unwrap();
        assert_eq!(addresses[0].label, "");
        assert!(!addresses[0].is_default());

        let dishes: Vec<Dish> = serde_json::from_value(json!([{
            "id": 7, "name": "鱼香肉丝", "categoryId": 1, "price": 22.0,
            "image": null, "description": null, "status": 1, "flavors": null
        }]))
        .unwrap();
        assert_eq!(dishes[0].description, "");
        assert!(dishes[0].flavors.is_empty());

        let order: Order = serde_json::from_value(json!({
            "id": 9, "number": "N9", "status": 1, "amount": null,
            "phone": null, "address": null, "consignee": null, "orderDetailList": null
        }))
        .unwrap();
        assert_eq!(order.address, "");
        assert_eq!(order.amount, 0.0);
        assert_eq!(order.status(), OrderStatus::PendingPayment);
    }
}
