//! 产品数据模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 价格保留的小数位数，与 `NUMERIC(10,2)` 一致
pub const PRICE_SCALE: u32 = 2;

/// 产品实体
///
/// `price` 以 JSON 数字而不是字符串序列化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// 创建和更新请求体
///
/// 请求中的 `id` 字段会被忽略，id 只来自存储层或路径参数。
#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[serde(default, with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

impl ProductPayload {
    /// 转换为产品实体，价格按两位小数取整
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price.round_dp(PRICE_SCALE),
        }
    }
}
