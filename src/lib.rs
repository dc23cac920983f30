//! # 产品 CRUD 服务
//!
//! 基于 Axum + SQLx 的分层示例服务：
//! - `app`：产品实体、存储接口、HTTP 处理器和路由表
//! - `core`：错误类型、JSON 响应编码、请求日志中间件
//! - `infrastructure`：PostgreSQL 连接池和日志初始化
//! - `config`：TOML 配置加载

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::create_routes;
pub use app::product::{AppState, Product, ProductRepository, StoreError};
