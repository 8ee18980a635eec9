//! fittrack-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

/// 环境变量前缀，嵌套字段用双下划线分隔，例如 `FITTRACK_DATABASE__URL`
const ENV_PREFIX: &str = "FITTRACK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_enabled: false,
        }
    }
}

/// 对象存储配置
///
/// 未配置 bucket 时不上传图片。
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    /// 本地存储根目录
    #[serde(default = "default_storage_root")]
    pub root: String,
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_storage_root() -> String {
    "./uploads".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8000/uploads".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl StorageConfig {
    pub fn is_enabled(&self) -> bool {
        self.bucket.as_deref().is_some_and(|b| !b.trim().is_empty())
    }

    /// 去掉空白后的 bucket 名
    pub fn bucket_name(&self) -> Option<String> {
        self.bucket
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
    }
}

/// 营养数据库（USDA FoodData Central）配置
///
/// 未配置 API key 时搜索返回空结果。
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    pub usda_api_key: Option<Secret<String>>,
    #[serde(default = "default_usda_base_url")]
    pub usda_base_url: String,
    #[serde(default = "default_nutrition_timeout")]
    pub timeout_secs: u64,
}

fn default_usda_base_url() -> String {
    "https://api.nal.usda.gov/fdc/v1".to_string()
}

fn default_nutrition_timeout() -> u64 {
    10
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            usda_api_key: None,
            usda_base_url: default_usda_base_url(),
            timeout_secs: default_nutrition_timeout(),
        }
    }
}

/// 食物识别（OpenAI 兼容的 chat completions 接口）配置
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_recognition_base_url")]
    pub base_url: String,
    #[serde(default = "default_recognition_model")]
    pub model: String,
    #[serde(default = "default_recognition_timeout")]
    pub timeout_secs: u64,
}

fn default_recognition_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_recognition_model() -> String {
    "gpt-4o".to_string()
}

fn default_recognition_timeout() -> u64 {
    60
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_recognition_base_url(),
            model: default_recognition_model(),
            timeout_secs: default_recognition_timeout(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// 逗号分隔的允许来源
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

fn default_cors_origins() -> String {
    "http://localhost:8081,http://localhost:19006,http://localhost:19000".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

impl CorsConfig {
    pub fn origin_list(&self) -> Vec<String> {
        self.origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub nutrition: NutritionConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Self::figment(config_dir, &env).extract()?;

        Ok(config)
    }

    fn figment(config_dir: &str, env: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
