use crate::takeout::error::{ClientError, ClientResult, FALLBACK_MESSAGE};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info};

/// 信封中表示成功的 code（小程序后端返回 1，部分网关返回 200）
pub const SUCCESS_CODES: [i32; 2] = [1, 200];

/// 统一的 API 响应包装结构体（包含 code、msg、data）
/// msg、data 可能为 null 或缺失，serde 会自动反序列化为 None
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        SUCCESS_CODES.contains(&self.code)
    }

    /// 成功时取出 data，失败时转为业务错误（msg 为空则使用兜底文案）
    pub fn into_result(self) -> ClientResult<Option<T>> {
        if self.is_success() {
            return Ok(self.data);
        }
        let message = self
            .msg
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Err(ClientError::Business {
            code: self.code,
            message,
        })
    }
}

/// 非 2xx 响应体里可能带的错误信息
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

/// 通用 HTTP 响应处理函数：校验 HTTP 状态，解析信封并返回 data
///
/// 401 在调用前由 `HttpClient` 单独处理，这里只负责其余情况。
pub fn handle_http_response<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body_bytes: &[u8],
    operation_name: &str,
) -> ClientResult<Option<T>> {
    let body_str = String::from_utf8_lossy(body_bytes);
    debug!("[HTTP] {} 响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {} 请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        let message = serde_json::from_slice::<ErrorBody>(body_bytes)
            .ok()
            .and_then(|b| b.msg)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("请求失败，HTTP状态: {}", status.as_u16()));
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let api_resp: ApiResponse<T> = serde_json::from_slice(body_bytes).map_err(|e| {
        error!(
            "[HTTP] {} 反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        ClientError::Decode(e.to_string())
    })?;

    if !api_resp.is_success() {
        error!(
            "[HTTP] {} 业务失败，code: {}, msg: {:?}",
            operation_name, api_resp.code, api_resp.msg
        );
    } else {
        info!("[HTTP] ✅ {} 成功", operation_name);
    }
    api_resp.into_result()
}

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 标量字段为 null 时取默认值（后端未设置的列会序列化为 null）
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 后端的 Long 型 ID 有时序列化为字符串、有时为数字，这里统一成字符串
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_id(deserializer)?.unwrap_or_default())
}

/// 可选 ID：null、缺失或空串都视为 None
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let id = match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "无法识别的 ID 类型: {}",
                other
            )))
        }
    };
    Ok(id.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
        tags: Vec<String>,
    }

    #[test]
    fn success_codes_unwrap_data() {
        for code in SUCCESS_CODES {
            let body = json!({"code": code, "msg": null, "data": {"name": "宫保鸡丁", "tags": ["辣"]}});
            let bytes = serde_json::to_vec(&body).unwrap();
            let data: Option<Payload> =
                handle_http_response(StatusCode::OK, &bytes, "测试").unwrap();
            assert_eq!(
                data,
                Some(Payload {
                    name: "宫保鸡丁".to_string(),
                    tags: vec!["辣".to_string()],
                })
            );
        }
    }

    #[test]
    fn missing_data_is_none() {
        let bytes = br#"{"code":1,"msg":"success"}"#;
        let data: Option<Payload> = handle_http_response(StatusCode::OK, bytes, "测试").unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn failure_code_uses_msg_or_fallback() {
        let bytes = r#"{"code":0,"msg":"店铺已打烊"}"#.as_bytes();
        let err = handle_http_response::<Payload>(StatusCode::OK, bytes, "测试").unwrap_err();
        assert_eq!(err.to_string(), "店铺已打烊");

        let bytes = br#"{"code":0}"#;
        let err = handle_http_response::<Payload>(StatusCode::OK, bytes, "测试").unwrap_err();
        assert!(matches!(err, ClientError::Business { code: 0, .. }));
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn http_error_prefers_body_msg() {
        let bytes = r#"{"msg":"服务器内部错误"}"#.as_bytes();
        let err = handle_http_response::<Payload>(StatusCode::INTERNAL_SERVER_ERROR, bytes, "测试")
            .unwrap_err();
        assert_eq!(err.to_string(), "服务器内部错误");

        let err = handle_http_response::<Payload>(StatusCode::BAD_GATEWAY, b"<html>", "测试")
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 502, .. }));
    }

    #[test]
    fn null_scalars_fall_back_to_default() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_null_default")]
            label: String,
            #[serde(default, deserialize_with = "deserialize_null_default")]
            status: i32,
        }
        let row: Row = serde_json::from_value(json!({"label": null, "status": null})).unwrap();
        assert_eq!(row.label, "");
        assert_eq!(row.status, 0);
        let row: Row = serde_json::from_value(json!({"label": "公司"})).unwrap();
        assert_eq!(row.label, "公司");
    }

    #[test]
    fn ids_accept_strings_and_numbers() {
        #[derive(Deserialize)]
        struct WithId {
            #[serde(deserialize_with = "deserialize_id")]
            id: String,
            #[serde(default, deserialize_with = "deserialize_optional_id")]
            other: Option<String>,
        }
        let a: WithId = serde_json::from_value(json!({"id": 1719000000000000001u64, "other": ""})).unwrap();
        assert_eq!(a.id, "1719000000000000001");
        assert!(a.other.is_none());
        let b: WithId = serde_json::from_value(json!({"id": "42", "other": 7})).unwrap();
        assert_eq!(b.id, "42");
        assert_eq!(b.other.as_deref(), Some("7"));
    }
}
