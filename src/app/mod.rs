//! 应用层

pub mod product;
pub mod routes;

pub use routes::create_routes;
