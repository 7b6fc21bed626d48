//! 运行配置加载
//!
//! 两种来源，字段相同：
//!
//! 1. 环境变量（会先读取 `.env`）：
//! ```text
//! OPENAI_API_KEY=sk-...
//! WEATHER_API_KEY=...
//! SKYWISE_MODEL=gpt-4o
//! SKYWISE_CHAT_URL=https://api.openai.com/v1/chat/completions
//! SKYWISE_WEATHER_URL=http://api.openweathermap.org/data/2.5
//! SKYWISE_TIMEOUT_SECS=30
//! SKYWISE_UNIT=metric
//! ```
//! 2. YAML 文件，键名与 [`Config`] 字段一致，未写的可选项取默认值。

use crate::error::{ConfigError, Result, SkywiseError};
use crate::weather::Unit;
use dotenv::dotenv;
use reqwest::Client;
use std::time::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub weather_api_key: String,
    /// Chat Completions 接口中使用的模型名
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat Completions 接口完整 URL
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
    /// OpenWeatherMap `data/2.5` 根路径，不带结尾斜杠
    #[serde(default = "default_weather_url")]
    pub weather_base_url: String,
    /// 所有 HTTP 请求共用的超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// 会话默认单位，可被命令行覆盖
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_true")]
    pub use_emojis: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_chat_url() -> String {
    DEFAULT_CHAT_URL.to_string()
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// 从 YAML 文件加载
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SkywiseError::Config(ConfigError::FileNotFound(path.to_string()))
            }
            _ => SkywiseError::Io(e),
        })?;
        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// 从进程环境变量加载（先尝试 `.env`）
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，`from_env` 和测试共用
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingField(key.to_string()))
        };

        let openai_api_key = required("OPENAI_API_KEY")?;
        let weather_api_key = required("WEATHER_API_KEY")?;

        let request_timeout_secs = match lookup("SKYWISE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "SKYWISE_TIMEOUT_SECS".to_string(),
                    message: e.to_string(),
                })?,
            None => default_timeout_secs(),
        };

        let unit = match lookup("SKYWISE_UNIT") {
            Some(raw) => raw.parse::<Unit>().map_err(|message| ConfigError::InvalidValue {
                field: "SKYWISE_UNIT".to_string(),
                message,
            })?,
            None => Unit::default(),
        };

        Ok(Self {
            openai_api_key,
            weather_api_key,
            model: lookup("SKYWISE_MODEL").unwrap_or_else(default_model),
            chat_url: lookup("SKYWISE_CHAT_URL").unwrap_or_else(default_chat_url),
            weather_base_url: lookup("SKYWISE_WEATHER_URL").unwrap_or_else(default_weather_url),
            request_timeout_secs,
            unit,
            use_emojis: true,
        })
    }

    /// 聊天与天气请求共用的 HTTP 客户端，带请求超时
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .map_err(|e| SkywiseError::Other(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("WEATHER_API_KEY", "owm-test"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.chat_url, DEFAULT_CHAT_URL);
        assert_eq!(config.weather_base_url, DEFAULT_WEATHER_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.unit, Unit::Metric);
        assert!(config.use_emojis);
    }

    #[test]
    fn test_http_client_builds_from_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("WEATHER_API_KEY", "owm-test"),
            ("SKYWISE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert!(config.http_client().is_ok());
    }

    #[test]
    fn test_from_lookup_missing_key() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        match err {
            SkywiseError::Config(ConfigError::MissingField(field)) => {
                assert_eq!(field, "WEATHER_API_KEY")
            }
            other => panic!("应该是缺少 WEATHER_API_KEY，实际: {other}"),
        }
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("WEATHER_API_KEY", "owm-test"),
            ("SKYWISE_MODEL", "gpt-4o-mini"),
            ("SKYWISE_TIMEOUT_SECS", "5"),
            ("SKYWISE_UNIT", "imperial"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.unit, Unit::Imperial);
    }

    #[test]
    fn test_from_lookup_invalid_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("WEATHER_API_KEY", "owm-test"),
            ("SKYWISE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            SkywiseError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "openai_api_key: sk-yaml\nweather_api_key: owm-yaml\nunit: imperial\nuse_emojis: false"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.openai_api_key, "sk-yaml");
        assert_eq!(config.unit, Unit::Imperial);
        assert!(!config.use_emojis);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(
            err,
            SkywiseError::Config(ConfigError::FileNotFound(_))
        ));
    }
}
