//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `DOBBE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `DOBBE_SERVER__PORT=9000`
/// - `DOBBE_API__URL=http://detector:8000/api/v1`
/// - `DOBBE_API__FAKE=true`
/// - `DOBBE_UPLOAD__ALLOWED_EXTENSIONS=dcm,rvg,dicom`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("api.url", "http://localhost:8000/api/v1")?
        .set_default("api.timeout_secs", 120)?
        .set_default("api.fake", false)?
        .set_default("api.fake_latency_ms", 200)?
        .set_default("upload.max_file_size", 10 * 1024 * 1024)?
        .set_default("upload.allowed_extensions", vec!["dcm", "rvg"])?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("DOBBE")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("upload.allowed_extensions")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !config.api.fake && config.api.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "API URL cannot be empty".to_string(),
        ));
    }

    if config.upload.max_file_size == 0 {
        return Err(ConfigError::ValidationError(
            "Upload max file size cannot be 0".to_string(),
        ));
    }

    if config.upload.policy().allowed_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one upload extension must be allowed".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.api.fake {
        tracing::info!("Detection API: fake ({}ms latency)", config.api.fake_latency_ms);
    } else {
        tracing::info!("Detection API: {}", config.api.url);
        tracing::info!("API Timeout: {}s", config.api.timeout_secs);
    }
    tracing::info!("Upload Max File Size: {} bytes", config.upload.max_file_size);
    tracing::info!(
        "Upload Extensions: {}",
        config.upload.allowed_extensions.join(", ")
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
