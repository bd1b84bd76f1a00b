//! 苍穹外卖客户端核心模块
//!
//! 负责 HTTP 封装、会话、路由守卫以及各页面的视图模型。

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod http;
pub mod inflight;
pub mod listener;
pub mod menu;
pub mod models;
pub mod navigation;
pub mod pagination;
pub mod router;
pub mod session;
pub mod types;
pub mod validation;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出客户端入口
pub use client::{Page, TakeoutClient};
