//! 产品处理器

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, RawQuery, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use super::model::ProductPayload;
use super::repository::ProductRepository;
use crate::core::error::{ApiError, INVALID_PRODUCT_ID};
use crate::core::response::{respond_with_json, ResultBody};

/// 列表接口单页最大条数，也是 `count` 越界时的默认值
pub const MAX_PAGE_SIZE: i64 = 10;

const INVALID_CREATE_PAYLOAD: &str = "Invalid request payload";
const INVALID_UPDATE_PAYLOAD: &str = "Invalid Request Payload";

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

/// 列表查询参数，解析失败按 0 处理
#[derive(Debug, Default)]
pub struct ListParams {
    pub count: Option<String>,
    pub start: Option<String>,
}

impl ListParams {
    /// 从原始查询串读取参数，同名参数只取第一个
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "count" => &mut params.count,
                "start" => &mut params.start,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// 返回 `(start, count)`：`count` 不在 `[1, 10]` 内时取 10，`start` 为负时取 0
    pub fn window(&self) -> (i64, i64) {
        let count = lenient_int(self.count.as_deref());
        let start = lenient_int(self.start.as_deref());

        let count = if (1..=MAX_PAGE_SIZE).contains(&count) {
            count
        } else {
            MAX_PAGE_SIZE
        };

        (start.max(0), count)
    }
}

fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(0)
}

/// 解析路径中的产品 id，只接受十进制数字串
pub fn parse_product_id(raw: &str) -> Result<i32, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest(INVALID_PRODUCT_ID.to_string()));
    }
    raw.parse()
        .map_err(|_| ApiError::BadRequest(INVALID_PRODUCT_ID.to_string()))
}

/// 路径参数无法提取（例如非 UTF-8 编码）时同样视为无效 id
fn path_product_id(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    match path {
        Ok(Path(raw_id)) => parse_product_id(&raw_id),
        Err(rejection) => {
            debug!("路径参数提取失败: {}", rejection.body_text());
            Err(ApiError::BadRequest(INVALID_PRODUCT_ID.to_string()))
        }
    }
}

fn decode_payload(body: &Bytes, malformed: &str) -> Result<ProductPayload, ApiError> {
    let payload: ProductPayload = serde_json::from_slice(body).map_err(|err| {
        debug!("请求体解析失败: {}", err);
        ApiError::BadRequest(malformed.to_string())
    })?;
    payload.validate()?;
    Ok(payload)
}

pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_product_id(path)?;
    let product = state.products.fetch(id).await?;
    Ok(respond_with_json(StatusCode::OK, &product))
}

pub async fn list_products(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let (start, count) = ListParams::from_query(query.as_deref()).window();
    let products = state.products.list(start, count).await?;
    Ok(respond_with_json(StatusCode::OK, &products))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = decode_payload(&body, INVALID_CREATE_PAYLOAD)?;

    let mut product = payload.into_product(0);
    state.products.create(&mut product).await?;

    info!("创建产品: {} ({})", product.name, product.id);
    Ok(respond_with_json(StatusCode::CREATED, &product))
}

pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = path_product_id(path)?;
    let payload = decode_payload(&body, INVALID_UPDATE_PAYLOAD)?;

    let product = payload.into_product(id);
    state.products.update(&product).await?;

    info!("更新产品: {} ({})", product.name, product.id);
    Ok(respond_with_json(StatusCode::OK, &product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_product_id(path)?;
    state.products.delete(id).await?;

    info!("删除产品: {}", id);
    Ok(respond_with_json(StatusCode::OK, &ResultBody::success()))
}
