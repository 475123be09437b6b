use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认历史记录文件
pub const DEFAULT_HISTORY_FILE: &str = "affirmation_history.json";
/// 默认生成模型
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Gemini REST 接口地址
pub const DEFAULT_GENERATION_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
/// 保存 API 密钥的环境变量
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 历史记录 JSON 文件路径
    pub history_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

/// 生成服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// 模型名称
    pub model: String,
    /// 接口地址
    pub base_url: String,
    /// API 密钥所在的环境变量名
    pub api_key_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_GENERATION_BASE_URL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
        }
    }
}

impl GenerationConfig {
    /// 从环境变量读取 API 密钥，缺失时返回空字符串
    pub fn api_key(&self) -> String {
        std::env::var(&self.api_key_env).unwrap_or_default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 生成服务配置
    pub generation: GenerationConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            generation: GenerationConfig::default(),
            logging: LoggingConfig::default(),
            app_name: "daily-affirmations".into(),
        }
    }
}

impl AppConfig {
    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8501);
        assert_eq!(
            config.storage.history_file,
            PathBuf::from("affirmation_history.json")
        );
        assert_eq!(config.generation.model, "gemini-1.5-flash");
        assert_eq!(config.generation.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.bind_addr(), "127.0.0.1:8501");
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"server":{"port":9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.generation.model, DEFAULT_MODEL);
    }
}
