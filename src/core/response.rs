//! 核心响应处理模块
//!
//! 所有成功和错误响应都经过 [`respond_with_json`] 写出。

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 错误响应结构 `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// 删除成功等无实体返回时使用的固定响应 `{"result": "success"}`
#[derive(Debug, Serialize)]
pub struct ResultBody {
    pub result: &'static str,
}

impl ResultBody {
    pub fn success() -> Self {
        Self { result: "success" }
    }
}

/// 序列化负载并写出 JSON 响应
///
/// 序列化失败时改为返回 500，避免带着成功状态码写出空响应体。
pub fn respond_with_json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => json_response(status, body),
        Err(err) => {
            error!("响应序列化失败: {}", err);
            let message = err.to_string();
            let body = serde_json::to_vec(&ErrorBody { error: &message }).unwrap_or_default();
            json_response(StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    }
}

/// 写出 `{"error": message}` 错误响应
pub fn respond_with_error(status: StatusCode, message: &str) -> Response {
    respond_with_json(status, &ErrorBody { error: message })
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}
