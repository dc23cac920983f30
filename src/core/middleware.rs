//! 核心中间件模块

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// 请求日志中间件
///
/// 记录匹配到的路由模板和路径中的产品 id，便于按产品检索访问日志。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "<unmatched>".to_string());
    let product_id = product_id_segment(req.uri().path()).map(str::to_string);

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %route, ?product_id, status, elapsed_ms, "请求失败");
    } else {
        info!(%method, %route, ?product_id, status, elapsed_ms, "请求完成");
    }

    response
}

/// 取出 `/product/{id}` 中的 id 段（原样，不做校验）
fn product_id_segment(path: &str) -> Option<&str> {
    path.strip_prefix("/product/")
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
}
