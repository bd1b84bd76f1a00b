//! 会话上下文
//!
//! 登录时创建、退出或 401 时销毁。HTTP 客户端和路由守卫在构造时拿到同一个
//! `SessionContext`，会话变化通过 broadcast 通道通知订阅者（例如跳转登录页的任务）。

pub mod store;

pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore};

use crate::takeout::error::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// 本地存储中 token 的键
pub const TOKEN_KEY: &str = "token";
/// 本地存储中用户 ID 的键
pub const USER_ID_KEY: &str = "userId";
/// 本地存储中登录时间（RFC 3339）的键
pub const LOGIN_TIME_KEY: &str = "loginTime";

/// 事件通道容量，足以缓冲一批并发失败的请求
const EVENT_CAPACITY: usize = 64;

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 登录成功
    Established { user_id: String },
    /// 用户主动退出
    LoggedOut,
    /// 服务器返回 401，本地会话已被清除
    Invalidated,
}

/// 当前会话
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// 登录时间；旧版本存储中没有记录时为 None
    pub created_at: Option<DateTime<Utc>>,
}

/// 会话上下文
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    /// 创建空会话（不读取存储）
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            current: RwLock::new(None),
            events,
        }
    }

    /// 从存储恢复上次的会话
    pub async fn restore(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let context = Self::new(store);
        let token = context
            .store
            .get_item(TOKEN_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        let user_id = context
            .store
            .get_item(USER_ID_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        let login_time = context
            .store
            .get_item(LOGIN_TIME_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let user_id = user_id.unwrap_or_default();
            info!("[Session] 🔑 恢复本地会话，用户ID: {}", user_id);
            *context.write() = Some(Session {
                token,
                user_id,
                created_at: login_time.as_deref().and_then(parse_login_time),
            });
        } else {
            debug!("[Session] 本地无会话");
        }
        Ok(context)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.user_id.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// 登录成功后建立会话并持久化
    pub async fn establish(&self, token: String, user_id: String) -> ClientResult<()> {
        self.store
            .set_item(TOKEN_KEY, &token)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        self.store
            .set_item(USER_ID_KEY, &user_id)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        let created_at = Utc::now();
        self.store
            .set_item(LOGIN_TIME_KEY, &created_at.to_rfc3339())
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;

        *self.write() = Some(Session {
            token,
            user_id: user_id.clone(),
            created_at: Some(created_at),
        });
        info!("[Session] ✅ 会话已建立，用户ID: {}", user_id);
        let _ = self.events.send(SessionEvent::Established { user_id });
        Ok(())
    }

    /// 主动退出登录
    pub async fn logout(&self) -> ClientResult<()> {
        self.write().take();
        self.clear_storage().await?;
        info!("[Session] 👋 已退出登录");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// 收到 401 后清除会话。
    ///
    /// 存储总会被清除（重复清除无副作用），但只有内存中确实存在会话时才发出
    /// `Invalidated` 事件，返回值表示本次是否发出了事件。
    pub async fn invalidate(&self) -> bool {
        let previous = self.write().take();
        if let Err(e) = self.clear_storage().await {
            warn!("[Session] 清除本地存储失败: {}", e);
        }
        match previous {
            Some(session) => {
                warn!(
                    "[Session] ⚠️ 会话已失效，用户ID: {}, 登录时间: {}",
                    session.user_id,
                    session
                        .created_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "未知".to_string())
                );
                let _ = self.events.send(SessionEvent::Invalidated);
                true
            }
            None => {
                debug!("[Session] 会话已被清除，忽略重复的失效通知");
                false
            }
        }
    }

    async fn clear_storage(&self) -> ClientResult<()> {
        self.store
            .remove_item(TOKEN_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        self.store
            .remove_item(USER_ID_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        self.store
            .remove_item(LOGIN_TIME_KEY)
            .await
            .map_err(|e| ClientError::Storage(format!("{:#}", e)))?;
        Ok(())
    }
}

fn parse_login_time(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            warn!("[Session] 无法解析登录时间 {}: {}", raw, e);
            None
        }
    }
}
