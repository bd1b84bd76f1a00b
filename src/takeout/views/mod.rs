//! 页面视图模型
//!
//! 每个页面一个视图模型：挂载时拉取数据，持有页面状态，调用 API。
//! 所有异步操作的错误都在发起它的页面内转成提示，再原样返回给调用方。

pub mod address;
pub mod checkout;
pub mod history;
pub mod home;
pub mod login;
pub mod my;
pub mod order_detail;
pub mod pay;

pub use address::{AddressFormMode, AddressFormView, AddressListView};
pub use checkout::CheckoutView;
pub use history::HistoryOrderView;
pub use home::{HomeState, HomeView, MenuSlot};
pub use login::LoginView;
pub use my::MyView;
pub use order_detail::OrderDetailView;
pub use pay::{PayView, SuccessView};

use crate::takeout::api::TakeoutApi;
use crate::takeout::config::ClientConfig;
use crate::takeout::error::{ClientError, ClientResult, LOGIN_REQUIRED_MESSAGE};
use crate::takeout::listener::NoticeHub;
use crate::takeout::navigation::Navigator;
use crate::takeout::session::SessionContext;
use std::sync::Arc;
use tracing::{debug, warn};

/// 视图共享的依赖
#[derive(Clone)]
pub struct ViewContext {
    pub api: Arc<TakeoutApi>,
    pub session: Arc<SessionContext>,
    pub navigator: Navigator,
    pub notices: Arc<NoticeHub>,
    pub config: Arc<ClientConfig>,
}

impl ViewContext {
    pub fn has_token(&self) -> bool {
        self.session.is_authenticated()
    }

    /// 提示错误并原样返回
    pub(crate) async fn fail<T>(&self, error: ClientError, fallback: &str) -> ClientResult<T> {
        let message = error.user_message(fallback);
        warn!("[View] ❌ {}", message);
        self.notices.error(message).await;
        Err(error)
    }

    /// 客户端规则拦截：提示并返回校验错误，不发请求
    pub(crate) async fn reject<T>(&self, message: &str) -> ClientResult<T> {
        self.fail(ClientError::Validation(message.to_string()), message)
            .await
    }

    /// 未登录时的错误（由页面决定如何引导登录，不弹提示）
    pub(crate) fn login_required(&self) -> ClientError {
        ClientError::Unauthorized {
            message: LOGIN_REQUIRED_MESSAGE.to_string(),
            session_cleared: false,
        }
    }

    /// 再来一单：清空购物车，按原订单加购后回到首页
    pub(crate) async fn repeat_order(&self, order_number: &str) -> ClientResult<()> {
        let result = async {
            self.api.cart.clean().await?;
            self.api.order.repetition(order_number).await
        }
        .await;
        match result {
            Ok(()) => {
                self.notices.success("已加入购物车").await;
                self.navigator.navigate("/home", false);
                Ok(())
            }
            Err(e) => self.fail(e, "操作失败").await,
        }
    }

    /// 催单
    pub(crate) async fn remind_order(&self, order_number: &str) -> ClientResult<()> {
        match self.api.order.reminder(order_number).await {
            Ok(()) => {
                debug!("[View] 催单成功: {}", order_number);
                self.notices.success("催单成功").await;
                Ok(())
            }
            Err(e) => self.fail(e, "催单失败").await,
        }
    }
}
