//! 产品存储层
//!
//! [`ProductRepository`] 定义了对产品表的五种数据操作。处理器只依赖这个 trait，
//! 生产环境使用 [`PgProductRepository`]，测试使用内存实现。

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::PgPool;

use super::model::Product;

pub const TABLE_CREATION_QUERY: &str = r#"
CREATE TABLE IF NOT EXISTS products
(
    id SERIAL,
    name TEXT NOT NULL,
    price NUMERIC(10,2) NOT NULL DEFAULT 0.00,
    CONSTRAINT products_pkey PRIMARY KEY (id)
)
"#;

/// 存储层错误
///
/// `NotFound` 只会由单行查询产生，其余失败一律归为 `Storage`。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("product not found")]
    NotFound,
    #[error("{0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Storage(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 产品数据访问接口
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 按 id 读取单个产品
    async fn fetch(&self, id: i32) -> StoreResult<Product>;

    /// 插入产品，并把生成的 id 写回 `product.id`
    async fn create(&self, product: &mut Product) -> StoreResult<()>;

    /// 按 id 覆盖 name 和 price。id 不存在时同样返回成功。
    async fn update(&self, product: &Product) -> StoreResult<()>;

    /// 按 id 删除。id 不存在时同样返回成功。
    async fn delete(&self, id: i32) -> StoreResult<()>;

    /// 按 id 顺序读取 `[start, start + count)` 范围内的产品
    async fn list(&self, start: i64, count: i64) -> StoreResult<Vec<Product>>;

    /// 建表（已存在时不做任何事）
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// 存储连通性检查
    async fn ping(&self) -> StoreResult<()>;
}

/// 基于 PostgreSQL 连接池的实现
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 清空产品表并重置 id 序列
    pub async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        sqlx::query("ALTER SEQUENCE products_id_seq RESTART WITH 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn fetch(&self, id: i32) -> StoreResult<Product> {
        let product =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(product)
    }

    async fn create(&self, product: &mut Product) -> StoreResult<()> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO products(name, price) VALUES($1, $2) RETURNING id",
        )
        .bind(&product.name)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        product.id = id;
        Ok(())
    }

    async fn update(&self, product: &Product) -> StoreResult<()> {
        sqlx::query("UPDATE products SET name = $1, price = $2 WHERE id = $3")
            .bind(&product.name)
            .bind(product.price)
            .bind(product.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, start: i64, count: i64) -> StoreResult<Vec<Product>> {
        let mut rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, price FROM products ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(count)
        .bind(start)
        .fetch(&self.pool);

        // 游标在 rows 离开作用域时释放，包括提前返回的错误路径
        let mut products = Vec::new();
        while let Some(product) = rows.try_next().await? {
            products.push(product);
        }

        Ok(products)
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(TABLE_CREATION_QUERY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
