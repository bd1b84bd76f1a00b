//! 外卖客户端入口
//!
//! 把配置、会话、HTTP、API、导航和提示组装在一起，并负责打开页面：
//! 先经过会话守卫，只有守卫放行的页面才会被创建和挂载。

use crate::takeout::api::TakeoutApi;
use crate::takeout::config::ClientConfig;
use crate::takeout::db::create_sqlite_pool_with_migration;
use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::listener::{NoticeHub, NoticeListener};
use crate::takeout::navigation::{
    spawn_session_redirector, GuardDecision, Navigator, SessionGuard,
};
use crate::takeout::router::Route;
use crate::takeout::session::{SessionContext, SessionStore, SqliteSessionStore};
use crate::takeout::views::{
    AddressFormMode, AddressFormView, AddressListView, CheckoutView, HistoryOrderView, HomeView,
    LoginView, MyView, OrderDetailView, PayView, SuccessView, ViewContext,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// 已挂载的页面
pub enum Page {
    Login(LoginView),
    Home(HomeView),
    Order(CheckoutView),
    My(MyView),
    AddressList(AddressListView),
    AddressForm(AddressFormView),
    OrderDetail(OrderDetailView),
    Pay(PayView),
    Success(SuccessView),
    HistoryOrder(HistoryOrderView),
}

impl Page {
    /// 页面对应的路由模板
    pub fn route(&self) -> &'static str {
        match self {
            Page::Login(_) => "/login",
            Page::Home(_) => "/home",
            Page::Order(_) => "/order",
            Page::My(_) => "/my",
            Page::AddressList(_) => "/address",
            Page::AddressForm(_) => "/address/form",
            Page::OrderDetail(_) => "/order/detail",
            Page::Pay(_) => "/pay",
            Page::Success(_) => "/success",
            Page::HistoryOrder(_) => "/history-order",
        }
    }
}

/// 外卖客户端
pub struct TakeoutClient {
    config: Arc<ClientConfig>,
    session: Arc<SessionContext>,
    api: Arc<TakeoutApi>,
    navigator: Navigator,
    guard: SessionGuard,
    notices: Arc<NoticeHub>,
    redirector: JoinHandle<()>,
}

impl TakeoutClient {
    /// 使用 SQLite 本地存储创建客户端（存储地址取自 `config.storage_url`）
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let pool = create_sqlite_pool_with_migration(&config.storage_url)
            .await
            .with_context(|| format!("打开本地存储失败: {}", config.storage_url))?;
        let store: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::new(pool));
        let client = Self::with_store(config, store)
            .await
            .context("创建客户端失败")?;
        Ok(client)
    }

    /// 使用指定的本地存储创建客户端，并从存储中恢复上次的会话
    pub async fn with_store(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
    ) -> ClientResult<Self> {
        let session = Arc::new(SessionContext::restore(store).await?);
        let http = HttpClient::new(&config, session.clone())?;
        let api = Arc::new(TakeoutApi::new(http));
        let navigator = Navigator::new(Route::Home);
        let notices = Arc::new(NoticeHub::default());
        let redirector = spawn_session_redirector(
            session.clone(),
            navigator.clone(),
            notices.clone(),
            config.redirect_delay,
        );

        info!(
            "[Client] 🚀 客户端已创建，API: {}，已登录: {}",
            config.api_base_url,
            session.is_authenticated()
        );

        Ok(Self {
            guard: SessionGuard::new(session.clone()),
            config: Arc::new(config),
            session,
            api,
            navigator,
            notices,
            redirector,
        })
    }

    /// 注册提示监听器（对已打开的页面和会话失效跳转同样生效）
    pub fn set_notice_listener(&mut self, listener: Arc<dyn NoticeListener>) {
        self.notices.set_listener(listener);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn api(&self) -> &TakeoutApi {
        &self.api
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    fn view_context(&self) -> ViewContext {
        ViewContext {
            api: self.api.clone(),
            session: self.session.clone(),
            navigator: self.navigator.clone(),
            notices: self.notices.clone(),
            config: self.config.clone(),
        }
    }

    /// 打开路径对应的页面。
    ///
    /// 未登录访问受保护页面时重定向到登录页，目标页面不会被创建，也不会发出任何请求。
    pub async fn open(&self, path: &str) -> Page {
        let requested = Route::parse(path);
        let route = match self.guard.resolve(requested) {
            GuardDecision::Mount(route) => self.navigator.navigate_to(route, false),
            GuardDecision::Redirect(route) => self.navigator.navigate_to(route, true),
        };
        self.mount(route).await
    }

    /// 重新打开导航器当前所在的页面
    pub async fn open_current(&self) -> Page {
        let current = self.navigator.current();
        match self.guard.resolve(current.clone()) {
            GuardDecision::Mount(route) => self.mount(route).await,
            GuardDecision::Redirect(route) => {
                let route = self.navigator.navigate_to(route, true);
                self.mount(route).await
            }
        }
    }

    async fn mount(&self, route: Route) -> Page {
        let ctx = self.view_context();
        let (page, mounted) = match route {
            Route::Login => {
                let view = LoginView::new(ctx);
                let mounted = view.mount().await;
                (Page::Login(view), mounted)
            }
            Route::Home => {
                let view = HomeView::new(ctx);
                let mounted = view.mount().await;
                (Page::Home(view), mounted)
            }
            Route::Order => {
                let view = CheckoutView::new(ctx);
                let mounted = view.mount().await;
                (Page::Order(view), mounted)
            }
            Route::My => {
                let view = MyView::new(ctx);
                let mounted = view.mount().await;
                (Page::My(view), mounted)
            }
            Route::AddressList => {
                let view = AddressListView::new(ctx);
                let mounted = view.mount().await;
                (Page::AddressList(view), mounted)
            }
            Route::AddressAdd => {
                let view = AddressFormView::new(ctx, AddressFormMode::Add);
                let mounted = view.mount().await;
                (Page::AddressForm(view), mounted)
            }
            Route::AddressEdit { id } => {
                let view = AddressFormView::new(ctx, AddressFormMode::Edit { id });
                let mounted = view.mount().await;
                (Page::AddressForm(view), mounted)
            }
            Route::OrderDetail { order_number } => {
                let view = OrderDetailView::new(ctx, order_number);
                let mounted = view.mount().await;
                (Page::OrderDetail(view), mounted)
            }
            Route::Pay { order_number } => {
                let view = PayView::new(ctx, order_number);
                let mounted = view.mount().await;
                (Page::Pay(view), mounted)
            }
            Route::Success { order_number } => {
                (Page::Success(SuccessView::new(ctx, order_number)), Ok(()))
            }
            Route::HistoryOrder => {
                let view = HistoryOrderView::new(ctx);
                let mounted = view.mount().await;
                (Page::HistoryOrder(view), mounted)
            }
        };
        if let Err(e) = mounted {
            debug!("[Client] 页面 {} 挂载时出错（已提示）: {}", page.route(), e);
        }
        page
    }

    /// 退出登录并跳转登录页
    pub async fn logout(&self) -> ClientResult<()> {
        self.session.logout().await?;
        self.navigator.navigate_to(Route::Login, true);
        Ok(())
    }
}

impl Drop for TakeoutClient {
    fn drop(&mut self) {
        self.redirector.abort();
    }
}

impl std::fmt::Debug for TakeoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TakeoutClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("authenticated", &self.session.is_authenticated())
            .field("current", &self.navigator.current())
            .finish()
    }
}
