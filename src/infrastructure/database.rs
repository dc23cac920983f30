//! 数据库基础设施

use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode},
    Error,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(connect_options(config)?)
            .await?;

        Ok(Self { pool })
    }

    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

/// 由配置生成连接参数，`url` 优先于分项字段
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, Error> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url);
    }

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname)
        .ssl_mode(PgSslMode::from_str(&config.sslmode)?))
}

/// 日志中显示的连接描述，不包含密码
pub fn describe(config: &DatabaseConfig) -> String {
    match &config.url {
        Some(url) => match url.rsplit_once('@') {
            Some((_, host)) => format!("postgres://***@{}", host),
            None => url.clone(),
        },
        None => format!(
            "host={} port={} user={} dbname={} sslmode={}",
            config.host, config.port, config.user, config.dbname, config.sslmode
        ),
    }
}
