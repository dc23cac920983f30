//! 配置模块
//!
//! 从 TOML 文件加载服务配置，找不到配置文件时使用默认值。

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PRODUCT_API_CONFIG";

/// 覆盖数据库连接描述的环境变量
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 完整连接串，设置后忽略下面的分项字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// TLS 模式 (disable, allow, prefer, require, verify-ca, verify-full)
    pub sslmode: String,
    /// 连接池最大连接数
    pub max_connections: u32,
    /// 获取连接的超时时间（秒）
    pub acquire_timeout_seconds: u64,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志文件目录
    pub log_dir: PathBuf,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 是否启用控制台输出
    pub console_output: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "12345".to_string(),
            dbname: "go_api".to_string(),
            sslmode: "disable".to_string(),
            max_connections: 20,
            acquire_timeout_seconds: 8,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8010,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_prefix: "product-api".to_string(),
            console_output: true,
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_SSL_MODES: [&str; 6] = [
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

impl AppConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.url.is_none() {
            if db.host.is_empty() {
                return Err(ConfigError::Validation("数据库主机不能为空".to_string()));
            }
            if db.port == 0 {
                return Err(ConfigError::Validation("数据库端口必须大于0".to_string()));
            }
            if db.dbname.is_empty() {
                return Err(ConfigError::Validation("数据库名称不能为空".to_string()));
            }
            if !VALID_SSL_MODES.contains(&db.sslmode.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "无效的 sslmode: {}，有效值: {:?}",
                    db.sslmode, VALID_SSL_MODES
                )));
            }
        }
        if db.max_connections == 0 {
            return Err(ConfigError::Validation("连接池大小必须大于0".to_string()));
        }

        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, VALID_LOG_LEVELS
            )));
        }

        Ok(())
    }

    /// HTTP 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                self.database.url = Some(url);
            }
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置并校验
///
/// 查找顺序：`PRODUCT_API_CONFIG` 指定的文件、`config.toml`、`./config/config.toml`。
/// 返回值中的路径为实际使用的配置文件，使用默认配置时为 `None`。
pub fn load_config() -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    let (mut config, source) = match locate_config_file() {
        Some(path) => (AppConfig::load_from_file(&path)?, Some(path)),
        None => (AppConfig::default(), None),
    };

    config.apply_env_overrides();
    config.validate()?;

    Ok((config, source))
}

fn locate_config_file() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    ["config.toml", "./config/config.toml"]
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.sslmode, "disable");
        assert_eq!(config.http.port, 8010);
        assert_eq!(config.listen_addr(), "0.0.0.0:8010");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.sslmode = "sometimes".to_string();
        assert!(config.validate().is_err());

        // 设置连接串后不再校验分项字段
        config.database.url = Some("postgres://localhost/products".to_string());
        assert!(config.validate().is_ok());

        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.http.port = 9090;
        fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.http.port, 9090);
        assert_eq!(loaded.database.dbname, config.database.dbname);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[http]\nport = 3000\n").unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.http.port, 3000);
        assert_eq!(loaded.http.bind_address, "0.0.0.0");
        assert_eq!(loaded.database.port, 5432);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[http\nport = ").unwrap();

        assert!(matches!(
            AppConfig::load_from_file(&config_path),
            Err(ConfigError::Parse(_))
        ));
    }
}
