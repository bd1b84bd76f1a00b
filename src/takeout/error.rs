//! 客户端错误类型
//!
//! 所有错误都可以直接转成给用户看的提示文案（`Display` 即提示内容）。

use thiserror::Error;

/// 业务失败且服务器没有给出 msg 时的兜底文案
pub const FALLBACK_MESSAGE: &str = "操作失败";
/// 超时、连接失败等传输层错误的提示
pub const NETWORK_MESSAGE: &str = "网络异常";
/// 未携带 token 时收到 401
pub const LOGIN_REQUIRED_MESSAGE: &str = "请先登录";
/// 携带 token 仍收到 401（token 已失效）
pub const SESSION_EXPIRED_MESSAGE: &str = "登录已过期，请重新登录";

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    /// 表单校验失败（客户端规则，未发出请求）
    #[error("{0}")]
    Validation(String),

    /// 信封 code 不在成功集合内
    #[error("{message}")]
    Business { code: i32, message: String },

    /// HTTP 401
    #[error("{message}")]
    Unauthorized {
        message: String,
        /// 本次是否清除了本地会话
        session_cleared: bool,
    },

    /// 其他非 2xx 响应
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 超时或连接失败
    #[error("网络异常")]
    Network(#[source] reqwest::Error),

    /// 响应体无法解析
    #[error("解析响应失败: {0}")]
    Decode(String),

    /// 成功响应中缺少必需的 data
    #[error("响应中缺少{0}")]
    MissingData(&'static str),

    /// 本地存储读写失败
    #[error("本地存储错误: {0}")]
    Storage(String),

    /// 客户端配置无效
    #[error("配置错误: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// 转成用户提示；内部错误（解析失败、缺字段）统一使用调用方给的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Decode(_) | ClientError::MissingData(_) | ClientError::Storage(_) => {
                fallback.to_string()
            }
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    fallback.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// 客户端操作结果
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_error_shows_server_message() {
        let err = ClientError::Business {
            code: 0,
            message: "库存不足".to_string(),
        };
        assert_eq!(err.user_message("添加失败"), "库存不足");
    }

    #[test]
    fn internal_errors_use_fallback() {
        let err = ClientError::MissingData("订单数据");
        assert_eq!(err.user_message("加载订单失败"), "加载订单失败");

        let err = ClientError::Business {
            code: 0,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message("操作失败"), "操作失败");
    }

    #[test]
    fn unauthorized_is_detected() {
        let err = ClientError::Unauthorized {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
            session_cleared: true,
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
    }
}
