//! 后端 HTTP API
//!
//! 每个资源一个无状态的 API 结构体，只负责参数整理和路径映射。

pub mod address;
pub mod auth;
pub mod cart;
pub mod category;
pub mod dish;
pub mod order;
pub mod setmeal;
pub mod shop;

pub use address::AddressApi;
pub use auth::AuthApi;
pub use cart::CartApi;
pub use category::CategoryApi;
pub use dish::DishApi;
pub use order::OrderApi;
pub use setmeal::SetmealApi;
pub use shop::ShopApi;

use crate::takeout::http::HttpClient;

/// 所有 API 的集合，共享同一个 `HttpClient`
#[derive(Clone)]
pub struct TakeoutApi {
    pub auth: AuthApi,
    pub category: CategoryApi,
    pub dish: DishApi,
    pub setmeal: SetmealApi,
    pub cart: CartApi,
    pub address: AddressApi,
    pub order: OrderApi,
    pub shop: ShopApi,
}

impl TakeoutApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            category: CategoryApi::new(http.clone()),
            dish: DishApi::new(http.clone()),
            setmeal: SetmealApi::new(http.clone()),
            cart: CartApi::new(http.clone()),
            address: AddressApi::new(http.clone()),
            order: OrderApi::new(http.clone()),
            shop: ShopApi::new(http),
        }
    }
}
