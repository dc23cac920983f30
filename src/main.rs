use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use product_api::app::product::{AppState, PgProductRepository, ProductRepository};
use product_api::config::load_config;
use product_api::create_routes;
use product_api::infrastructure::{database, database::DatabaseManager, logger::Logger};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config().context("加载配置失败")?;
    let _log_guard = Logger::init(&config.logging).context("初始化日志失败")?;

    match &source {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    info!("连接数据库: {}", database::describe(&config.database));
    let db = DatabaseManager::new(&config.database).await.map_err(|e| {
        error!("数据库连接失败: {}", e);
        e
    })?;

    let repository = PgProductRepository::new(db.into_pool());
    repository.ensure_schema().await.context("创建 products 表失败")?;
    info!("products 表已就绪");

    let state = AppState::new(Arc::new(repository));
    let app = create_routes(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.http.timeout_seconds,
    )));

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 产品服务运行在 http://{}", addr);
    info!("   GET    /products?count=&start= - 产品列表");
    info!("   POST   /product                - 创建产品");
    info!("   GET    /product/:id            - 获取产品");
    info!("   PUT    /product/:id            - 更新产品");
    info!("   DELETE /product/:id            - 删除产品");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听退出信号失败: {}", e);
    }
    info!("收到退出信号，正在关闭服务...");
}
