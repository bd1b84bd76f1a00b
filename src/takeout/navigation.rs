//! 导航与会话守卫
//!
//! - `Navigator`：可在任意位置触发跳转的导航器（保存历史记录）
//! - `SessionGuard`：根据 token 和目标路由决定是否挂载页面
//! - `spawn_session_redirector`：订阅会话事件，401 后统一跳转登录页

use crate::takeout::error::LOGIN_REQUIRED_MESSAGE;
use crate::takeout::listener::NoticeHub;
use crate::takeout::router::Route;
use crate::takeout::session::{SessionContext, SessionEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 一次跳转记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub route: Route,
    pub replace: bool,
}

#[derive(Debug)]
struct NavigatorState {
    history: Vec<Route>,
    log: Vec<NavigationEntry>,
}

/// 导航器，克隆后共享同一份历史
#[derive(Debug, Clone)]
pub struct Navigator {
    state: Arc<Mutex<NavigatorState>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavigatorState {
                history: vec![initial],
                log: Vec::new(),
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, NavigatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 跳转到路径，`replace` 为 true 时替换当前历史记录
    pub fn navigate(&self, path: &str, replace: bool) -> Route {
        self.navigate_to(Route::parse(path), replace)
    }

    pub fn navigate_to(&self, route: Route, replace: bool) -> Route {
        let mut state = self.state();
        if replace {
            state.history.pop();
        }
        state.history.push(route.clone());
        state.log.push(NavigationEntry {
            route: route.clone(),
            replace,
        });
        info!(
            "[Navigator] ➡️ {}{}",
            route,
            if replace { "（替换）" } else { "" }
        );
        route
    }

    /// 返回上一页，没有上一页时停留在当前页
    pub fn back(&self) -> Route {
        let mut state = self.state();
        if state.history.len() > 1 {
            state.history.pop();
        }
        let current = state.history.last().cloned().unwrap_or(Route::Home);
        debug!("[Navigator] ⬅️ 返回 {}", current);
        current
    }

    pub fn current(&self) -> Route {
        self.state().history.last().cloned().unwrap_or(Route::Home)
    }

    pub fn history(&self) -> Vec<Route> {
        self.state().history.clone()
    }

    /// 所有跳转记录（按发生顺序）
    pub fn log(&self) -> Vec<NavigationEntry> {
        self.state().log.clone()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

// ========== 会话守卫 ==========

/// 守卫状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Authorized,
    Unauthorized,
}

/// 守卫结论：挂载目标页面，或者重定向（重定向时目标页面不会被创建）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Mount(Route),
    Redirect(Route),
}

/// 会话守卫
#[derive(Clone)]
pub struct SessionGuard {
    session: Arc<SessionContext>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }

    /// 有 token 或访问公开页面即为已授权
    pub fn state_for(&self, route: &Route) -> GuardState {
        if self.session.is_authenticated() || route.is_public() {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        }
    }

    pub fn resolve(&self, route: Route) -> GuardDecision {
        if route == Route::Login && self.session.is_authenticated() {
            debug!("[Guard] 已登录，登录页重定向到首页");
            return GuardDecision::Redirect(Route::Home);
        }
        match self.state_for(&route) {
            GuardState::Authorized => GuardDecision::Mount(route),
            GuardState::Unauthorized => {
                info!("[Guard] 🔒 未登录访问 {}，重定向到登录页", route);
                GuardDecision::Redirect(Route::Login)
            }
        }
    }
}

// ========== 401 跳转任务 ==========

/// 启动会话失效跳转任务。
///
/// 每收到一次 `Invalidated`：先提示“请先登录”，等待 `delay` 后若仍未重新登录、
/// 且当前不在登录页，则以替换方式跳转 `/login`。同一批失效事件只跳转一次。
pub fn spawn_session_redirector(
    session: Arc<SessionContext>,
    navigator: Navigator,
    notices: Arc<NoticeHub>,
    delay: Duration,
) -> JoinHandle<()> {
    let mut events = session.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Invalidated) => {
                    // 合并同一批排队中的事件
                    loop {
                        match events.try_recv() {
                            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                        }
                    }

                    notices.error(LOGIN_REQUIRED_MESSAGE).await;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }

                    if session.is_authenticated() {
                        debug!("[Redirector] 已重新登录，取消跳转");
                        continue;
                    }
                    if navigator.current() == Route::Login {
                        debug!("[Redirector] 已在登录页，跳过跳转");
                        continue;
                    }
                    warn!("[Redirector] 🔐 会话失效，跳转登录页");
                    navigator.navigate_to(Route::Login, true);
                }
                Ok(event) => {
                    debug!("[Redirector] 会话事件: {:?}", event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[Redirector] 会话事件积压，丢弃 {} 条", skipped);
                }
                Err(RecvError::Closed) => {
                    debug!("[Redirector] 会话事件通道已关闭，退出");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takeout::session::MemorySessionStore;
    use crate::takeout::test_support::{eventually, init_test_logger};

    fn session() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(Arc::new(MemorySessionStore::new())))
    }

    #[test]
    fn navigator_push_replace_and_back() {
        let navigator = Navigator::default();
        navigator.navigate("/my", false);
        navigator.navigate("/address", false);
        navigator.navigate("/address/add", true);
        assert_eq!(
            navigator.history(),
            vec![Route::Home, Route::My, Route::AddressAdd]
        );
        assert_eq!(navigator.back(), Route::My);
        assert_eq!(navigator.back(), Route::Home);
        assert_eq!(navigator.back(), Route::Home);
        assert_eq!(navigator.log().len(), 3);
    }

    #[tokio::test]
    async fn guard_blocks_private_routes_without_token() {
        let session = session();
        let guard = SessionGuard::new(session.clone());

        assert_eq!(guard.state_for(&Route::Home), GuardState::Authorized);
        assert_eq!(guard.state_for(&Route::My), GuardState::Unauthorized);
        assert_eq!(
            guard.resolve(Route::HistoryOrder),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(guard.resolve(Route::Login), GuardDecision::Mount(Route::Login));

        session
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();
        assert_eq!(guard.resolve(Route::My), GuardDecision::Mount(Route::My));
        assert_eq!(guard.resolve(Route::Login), GuardDecision::Redirect(Route::Home));
    }

    #[tokio::test]
    async fn redirector_navigates_once_per_invalidation() {
        init_test_logger();
        let session = session();
        let navigator = Navigator::new(Route::My);
        let handle = spawn_session_redirector(
            session.clone(),
            navigator.clone(),
            Arc::new(NoticeHub::default()),
            Duration::ZERO,
        );

        session
            .establish("tk".to_string(), "1".to_string())
            .await
            .unwrap();
        assert!(session.invalidate().await);
        assert!(!session.invalidate().await);

        assert!(eventually(|| navigator.current() == Route::Login).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let redirects = navigator
            .log()
            .into_iter()
            .filter(|entry| entry.route == Route::Login)
            .count();
        assert_eq!(redirects, 1);
        assert_eq!(navigator.history(), vec![Route::Login]);
        handle.abort();
    }
}
