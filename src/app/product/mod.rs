//! 产品模块：实体、存储和 HTTP 处理器

pub mod handler;
pub mod memory;
pub mod model;
pub mod repository;

pub use handler::AppState;
pub use memory::MemoryProductRepository;
pub use model::{Product, ProductPayload};
pub use repository::{PgProductRepository, ProductRepository, StoreError};
