//! 路由表
//!
//! 路径与页面一一对应，未匹配的路径一律重定向到首页。

use reqwest::Url;
use std::fmt;

/// 路由占位主机，仅用于借助 `Url` 解析路径和查询参数
const PARSE_BASE: &str = "http://takeout.local";

/// 页面路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    /// 结算页
    Order,
    My,
    AddressList,
    AddressAdd,
    AddressEdit { id: String },
    OrderDetail { order_number: String },
    Pay { order_number: Option<String> },
    Success { order_number: Option<String> },
    HistoryOrder,
}

impl Route {
    /// 解析路径（可带查询参数）。未知路径返回首页
    pub fn parse(path: &str) -> Self {
        Self::try_parse(path).unwrap_or(Route::Home)
    }

    /// 解析路径，未知路径返回 None
    pub fn try_parse(path: &str) -> Option<Self> {
        let raw = if path.starts_with('/') {
            format!("{}{}", PARSE_BASE, path)
        } else {
            format!("{}/{}", PARSE_BASE, path)
        };
        let url = Url::parse(&raw).ok()?;
        let order_number = url
            .query_pairs()
            .find(|(k, _)| k == "orderNumber")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["home"] => Route::Home,
            ["order"] => Route::Order,
            ["my"] => Route::My,
            ["address"] => Route::AddressList,
            ["address", "add"] => Route::AddressAdd,
            ["address", "edit", id] => Route::AddressEdit { id: id.to_string() },
            ["order", "detail", number] => Route::OrderDetail {
                order_number: number.to_string(),
            },
            ["pay"] => Route::Pay { order_number },
            ["success"] => Route::Success { order_number },
            ["history-order"] => Route::HistoryOrder,
            _ => return None,
        };
        Some(route)
    }

    /// 规范路径
    pub fn path(&self) -> String {
        fn with_order_number(base: &str, order_number: &Option<String>) -> String {
            match order_number {
                Some(number) => format!("{}?orderNumber={}", base, number),
                None => base.to_string(),
            }
        }

        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/home".to_string(),
            Route::Order => "/order".to_string(),
            Route::My => "/my".to_string(),
            Route::AddressList => "/address".to_string(),
            Route::AddressAdd => "/address/add".to_string(),
            Route::AddressEdit { id } => format!("/address/edit/{}", id),
            Route::OrderDetail { order_number } => format!("/order/detail/{}", order_number),
            Route::Pay { order_number } => with_order_number("/pay", order_number),
            Route::Success { order_number } => with_order_number("/success", order_number),
            Route::HistoryOrder => "/history-order".to_string(),
        }
    }

    /// 无需登录即可访问的路由
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ========== 底部标签栏 ==========

/// 底部标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKey {
    Home,
    Order,
    My,
}

impl TabKey {
    pub const ALL: [TabKey; 3] = [TabKey::Home, TabKey::Order, TabKey::My];

    pub fn path(self) -> &'static str {
        match self {
            TabKey::Home => "/home",
            TabKey::Order => "/order",
            TabKey::My => "/my",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TabKey::Home => "首页",
            TabKey::Order => "订单",
            TabKey::My => "我的",
        }
    }

    /// 只接受三个标签的路径，其他值不允许通过标签栏跳转
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.path() == path)
    }
}

/// 当前路径对应的选中标签：`/my` 开头的路径选中“我的”，未知路径选中首页
pub fn active_tab(pathname: &str) -> TabKey {
    if pathname.starts_with("/my") {
        return TabKey::My;
    }
    TabKey::from_path(pathname).unwrap_or(TabKey::Home)
}
