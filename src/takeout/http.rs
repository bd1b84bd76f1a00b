//! HTTP 客户端封装
//!
//! 每个请求自动附带会话 token 和 operationID，响应统一经过信封解析。
//! 401 时清除会话并通过会话事件通知订阅者，本身不做任何跳转。

use crate::takeout::config::ClientConfig;
use crate::takeout::error::{
    ClientError, ClientResult, LOGIN_REQUIRED_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
use crate::takeout::session::SessionContext;
use crate::takeout::types::handle_http_response;
use reqwest::header::HeaderName;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 带认证拦截的 HTTP 客户端
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    token_header: HeaderName,
    session: Arc<SessionContext>,
}

impl HttpClient {
    /// 创建 HTTP 客户端，`session` 在整个客户端生命周期内共享
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> ClientResult<Self> {
        let token_header = HeaderName::from_bytes(config.token_header.as_bytes())
            .map_err(|e| ClientError::Config(format!("无效的 token 请求头: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("创建 HTTP 客户端失败: {}", e)))?;
        Ok(Self {
            client,
            config: Arc::new(config.clone()),
            token_header,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// GET 请求
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let (request, had_token) = self.prepare(Method::GET, path);
        self.dispatch(request, had_token, &format!("GET {}", path))
            .await
    }

    /// 带查询参数的 GET 请求
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let (request, had_token) = self.prepare(Method::GET, path);
        self.dispatch(request.query(query), had_token, &format!("GET {}", path))
            .await
    }

    /// 带 JSON body 的 POST 请求
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (request, had_token) = self.prepare(Method::POST, path);
        self.dispatch(request.json(body), had_token, &format!("POST {}", path))
            .await
    }

    /// 无 body 的 POST 请求
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let (request, had_token) = self.prepare(Method::POST, path);
        self.dispatch(request, had_token, &format!("POST {}", path))
            .await
    }

    /// 带 JSON body 的 PUT 请求
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (request, had_token) = self.prepare(Method::PUT, path);
        self.dispatch(request.json(body), had_token, &format!("PUT {}", path))
            .await
    }

    /// 无 body 的 PUT 请求
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let (request, had_token) = self.prepare(Method::PUT, path);
        self.dispatch(request, had_token, &format!("PUT {}", path))
            .await
    }

    /// DELETE 请求
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let (request, had_token) = self.prepare(Method::DELETE, path);
        self.dispatch(request, had_token, &format!("DELETE {}", path))
            .await
    }

    /// 带查询参数的 DELETE 请求
    pub async fn delete_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let (request, had_token) = self.prepare(Method::DELETE, path);
        self.dispatch(request.query(query), had_token, &format!("DELETE {}", path))
            .await
    }

    /// 构造请求并注入 token，返回是否携带了 token
    fn prepare(&self, method: Method, path: &str) -> (RequestBuilder, bool) {
        let url = self.config.endpoint(path);
        let mut request = self.client.request(method, &url);
        let token = self.session.token();
        if let Some(token) = &token {
            request = request.header(self.token_header.clone(), token.as_str());
        }
        (request, token.is_some())
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        had_token: bool,
        operation_name: &str,
    ) -> ClientResult<Option<T>> {
        let operation_id = Uuid::new_v4().to_string();
        info!("[HTTP] 📡 {}", operation_name);
        debug!(
            "[HTTP]   携带token: {}, 操作ID: {}",
            had_token, operation_id
        );

        let response = request
            .header("operationID", &operation_id)
            .send()
            .await
            .map_err(|e| {
                error!("[HTTP] {} 请求失败: {}", operation_name, e);
                ClientError::Network(e)
            })?;

        let status = response.status();
        // 读取 body bytes（只能读取一次）
        let body_bytes = response.bytes().await.map_err(|e| {
            error!("[HTTP] {} 读取响应 body 失败: {}", operation_name, e);
            ClientError::Network(e)
        })?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(had_token, operation_name).await);
        }

        handle_http_response(status, &body_bytes, operation_name)
    }

    /// 401 处理：携带过 token 说明会话已过期，清除会话并发出失效事件
    async fn handle_unauthorized(&self, had_token: bool, operation_name: &str) -> ClientError {
        if had_token {
            warn!("[HTTP] ⚠️ {} 返回 401，清除本地会话", operation_name);
            self.session.invalidate().await;
            ClientError::Unauthorized {
                message: SESSION_EXPIRED_MESSAGE.to_string(),
                session_cleared: true,
            }
        } else {
            debug!("[HTTP] {} 返回 401，当前未登录", operation_name);
            ClientError::Unauthorized {
                message: LOGIN_REQUIRED_MESSAGE.to_string(),
                session_cleared: false,
            }
        }
    }
}
