//! 用户认证 API

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::format::mask_phone;
use crate::takeout::http::HttpClient;
use crate::takeout::models::{LoginRequest, LoginResult, UserInfo};
use tracing::info;

#[derive(Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 手机号 + 密码登录
    pub async fn login(&self, phone: &str, password: &str) -> ClientResult<LoginResult> {
        info!("[AuthAPI] 🔐 手机号登录: {}", mask_phone(phone));
        let request = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };
        let result: LoginResult = self
            .http
            .post("/user/phoneLogin", &request)
            .await?
            .ok_or(ClientError::MissingData("登录数据"))?;
        if result.token.is_empty() {
            return Err(ClientError::MissingData("token"));
        }
        Ok(result)
    }

    /// 获取当前登录用户信息
    pub async fn user_info(&self) -> ClientResult<UserInfo> {
        self.http
            .get("/user/info")
            .await?
            .ok_or(ClientError::MissingData("用户信息"))
    }
}
