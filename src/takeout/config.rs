use std::time::Duration;

/// 默认后端地址（开发环境下 /api 代理到 8080 端口的 /user 前缀）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/user";
/// 默认本地存储（SQLite）
pub const DEFAULT_STORAGE_URL: &str = "sqlite://takeout.db?mode=rwc";

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// HTTP API 基础地址
    pub api_base_url: String,
    /// 单次请求超时
    pub timeout: Duration,
    /// 携带 token 的请求头名称
    pub token_header: String,
    /// 本地存储 URL，例如 `sqlite://takeout.db?mode=rwc` 或 `sqlite::memory:`
    pub storage_url: String,
    /// 会话失效后跳转登录页前的延迟（让提示先展示出来）
    pub redirect_delay: Duration,
    /// 支付成功后跳转结果页前的延迟
    pub pay_redirect_delay: Duration,
    /// 历史订单每页条数
    pub page_size: u32,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            timeout: Duration::from_secs(10),
            token_header: "authentication".to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            redirect_delay: Duration::from_millis(500),
            pay_redirect_delay: Duration::from_secs(1),
            page_size: 10,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    pub fn with_storage_url(mut self, url: impl Into<String>) -> Self {
        self.storage_url = url.into();
        self
    }

    /// 同时设置登录跳转和支付跳转的延迟（测试中一般设为 0）
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self.pay_redirect_delay = delay;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// 拼接完整请求地址，`path` 以 `/` 开头
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
