//! 天气数据模型与数据源接口
//!
//! [`WeatherProvider`] 返回 [`WeatherReport`]：要么是整理好的记录，要么是
//! `{"error": ...}` 形式的 [`ErrorRecord`]。后者不是 Rust 错误，而是会原样
//! 作为工具结果交给模型。只有网络故障、响应体缺字段才会走 `Err`。

pub mod enrich;
mod openweather;

pub use openweather::{OpenWeatherClient, summarize_forecast};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 接口缺失字段时使用的占位值
pub const NOT_AVAILABLE: &str = "N/A";

/// 每天的预报采样数（数据源按 3 小时一档返回）
pub const SAMPLES_PER_DAY: usize = 8;

/// 温度单位制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "celsius")]
    Metric,
    #[serde(alias = "fahrenheit")]
    Imperial,
}

impl Unit {
    /// 作为 `units` 查询参数的取值
    pub fn as_query(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    /// 写入记录 `unit` 字段的标签
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Metric => "Celsius",
            Unit::Imperial => "Fahrenheit",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "celsius" => Ok(Unit::Metric),
            "imperial" | "fahrenheit" => Ok(Unit::Imperial),
            other => Err(format!(
                "unknown unit '{}', expected metric or imperial",
                other
            )),
        }
    }
}

/// 当前天气，字段扁平化后直接序列化给模型
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub location: String,
    pub country: String,
    pub temperature: f64,
    pub temperature_feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    #[serde(serialize_with = "value_or_na")]
    pub wind_gust: Option<f64>,
    #[serde(serialize_with = "value_or_na")]
    pub visibility: Option<f64>,
    /// Unix 时间戳（秒）
    pub sunrise: i64,
    pub sunset: i64,
    pub unit: String,
    pub description: String,
    pub cloudiness: f64,
    #[serde(serialize_with = "value_or_na")]
    pub precipitation_probability: Option<f64>,
}

fn value_or_na<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

/// 单日预报：由当天 8 个采样平均得到
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    /// 从 1 开始
    pub day: u32,
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
}

/// 预报接口的单个 3 小时采样
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
}

/// 数据源返回非 200 时交给模型的错误记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl ErrorRecord {
    pub fn for_location(location: &str) -> Self {
        Self {
            error: format!("Could not fetch weather for {}", location),
        }
    }
}

/// 一次查询的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherReport<T> {
    Found(T),
    Unavailable(ErrorRecord),
}

impl<T> WeatherReport<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            WeatherReport::Found(value) => Some(value),
            WeatherReport::Unavailable(_) => None,
        }
    }
}

/// 天气数据源
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// 当前天气
    async fn fetch_current(
        &self,
        location: &str,
        unit: Unit,
    ) -> Result<WeatherReport<WeatherRecord>>;

    /// 未来 `days` 天预报，每天一条；`days` 不做上限裁剪
    async fn fetch_forecast(
        &self,
        location: &str,
        days: u32,
        unit: Unit,
    ) -> Result<WeatherReport<Vec<ForecastEntry>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(gust: Option<f64>) -> WeatherRecord {
        WeatherRecord {
            location: "Colombo".to_string(),
            country: "LK".to_string(),
            temperature: 32.0,
            temperature_feels_like: 38.5,
            humidity: 85.0,
            pressure: 1009.0,
            wind_speed: 5.0,
            wind_gust: gust,
            visibility: None,
            sunrise: 1_700_000_000,
            sunset: 1_700_043_000,
            unit: Unit::Metric.label().to_string(),
            description: "clear sky".to_string(),
            cloudiness: 0.0,
            precipitation_probability: None,
        }
    }

    #[test]
    fn test_missing_readings_serialize_as_na() {
        let value = serde_json::to_value(record(None)).unwrap();
        assert_eq!(value["wind_gust"], json!("N/A"));
        assert_eq!(value["visibility"], json!("N/A"));
        assert_eq!(value["precipitation_probability"], json!("N/A"));

        let value = serde_json::to_value(record(Some(7.5))).unwrap();
        assert_eq!(value["wind_gust"], json!(7.5));
    }

    #[test]
    fn test_unavailable_report_is_bare_error_object() {
        let report: WeatherReport<WeatherRecord> =
            WeatherReport::Unavailable(ErrorRecord::for_location("Atlantis"));
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"error": "Could not fetch weather for Atlantis"})
        );
    }

    #[test]
    fn test_unit_parsing_and_labels() {
        assert_eq!("metric".parse::<Unit>().unwrap(), Unit::Metric);
        assert_eq!("Celsius".parse::<Unit>().unwrap(), Unit::Metric);
        assert_eq!("imperial".parse::<Unit>().unwrap(), Unit::Imperial);
        assert!("kelvin".parse::<Unit>().is_err());

        assert_eq!(Unit::Metric.label(), "Celsius");
        assert_eq!(Unit::Imperial.label(), "Fahrenheit");
        assert_eq!(Unit::Imperial.as_query(), "imperial");
    }
}
