//! 路由表

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use super::product::handler::{
    create_product, delete_product, get_product, list_products, update_product, AppState,
};
use crate::core::error::ApiError;
use crate::core::middleware::request_logging_middleware;
use crate::core::response::respond_with_json;

/// 创建全部路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products))
        .route("/product", post(create_product))
        .route(
            "/product/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查，同时确认存储可用
async fn health_check(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.products.ping().await?;
    Ok(respond_with_json(StatusCode::OK, &json!({ "status": "ok" })))
}
