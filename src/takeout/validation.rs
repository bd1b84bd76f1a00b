//! 表单校验规则
//!
//! 校验在发请求前完成，失败时返回 `ClientError::Validation`，文案即表单提示。

use crate::takeout::error::{ClientError, ClientResult};
use regex::Regex;
use std::sync::LazyLock;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1[3-9]\d{9}$").unwrap_or_else(|e| panic!("手机号正则无效: {}", e))
});

/// 密码最小长度
pub const MIN_PASSWORD_LEN: usize = 6;

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}

/// 手机号：必填 + 大陆手机号格式
pub fn validate_phone(phone: &str) -> ClientResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(invalid("请输入手机号"));
    }
    if !PHONE_PATTERN.is_match(phone) {
        return Err(invalid("请输入正确的手机号"));
    }
    Ok(())
}

/// 登录表单
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ClientResult<()> {
        validate_phone(&self.phone)?;
        if self.password.is_empty() {
            return Err(invalid("请输入密码"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("密码至少6位"));
        }
        Ok(())
    }
}

/// 地址表单（省市区不在表单里，由页面根据新增 / 编辑模式补齐）
#[derive(Debug, Clone, PartialEq)]
pub struct AddressForm {
    pub consignee: String,
    pub phone: String,
    /// "1" 先生，"0" 女士
    pub sex: String,
    pub detail: String,
    pub label: String,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            consignee: String::new(),
            phone: String::new(),
            sex: "1".to_string(),
            detail: String::new(),
            label: String::new(),
        }
    }
}

impl AddressForm {
    pub fn validate(&self) -> ClientResult<()> {
        if self.consignee.trim().is_empty() {
            return Err(invalid("请输入收货人"));
        }
        validate_phone(&self.phone)?;
        if self.detail.trim().is_empty() {
            return Err(invalid("请输入详细地址"));
        }
        Ok(())
    }
}
