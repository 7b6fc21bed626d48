//! Mock 天气数据源，按地点预设返回值，并记录每次调用。
//!
//! 未预设的地点返回 `{"error": "Could not fetch weather for <location>"}`，
//! 与真实数据源非 200 时的行为一致。

use crate::error::Result;
use crate::weather::{
    ErrorRecord, ForecastEntry, Unit, WeatherProvider, WeatherRecord, WeatherReport,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 一次数据源调用
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherCall {
    Current { location: String, unit: Unit },
    Forecast { location: String, days: u32, unit: Unit },
}

#[derive(Default)]
pub struct MockWeatherProvider {
    current: HashMap<String, WeatherRecord>,
    forecast: HashMap<String, Vec<ForecastEntry>>,
    calls: Arc<Mutex<Vec<WeatherCall>>>,
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(mut self, location: impl Into<String>, record: WeatherRecord) -> Self {
        self.current.insert(location.into(), record);
        self
    }

    pub fn with_forecast(
        mut self,
        location: impl Into<String>,
        entries: Vec<ForecastEntry>,
    ) -> Self {
        self.forecast.insert(location.into(), entries);
        self
    }

    pub fn calls(&self) -> Vec<WeatherCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 构造一条只关心核心读数的当前天气记录，其余字段取占位值
    pub fn record(
        location: &str,
        description: &str,
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
    ) -> WeatherRecord {
        WeatherRecord {
            location: location.to_string(),
            country: String::new(),
            temperature,
            temperature_feels_like: temperature,
            humidity,
            pressure: 1013.0,
            wind_speed,
            wind_gust: None,
            visibility: None,
            sunrise: 0,
            sunset: 0,
            unit: Unit::Metric.label().to_string(),
            description: description.to_string(),
            cloudiness: 0.0,
            precipitation_probability: None,
        }
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn fetch_current(
        &self,
        location: &str,
        unit: Unit,
    ) -> Result<WeatherReport<WeatherRecord>> {
        self.calls.lock().unwrap().push(WeatherCall::Current {
            location: location.to_string(),
            unit,
        });

        Ok(match self.current.get(location) {
            Some(record) => WeatherReport::Found(WeatherRecord {
                unit: unit.label().to_string(),
                ..record.clone()
            }),
            None => WeatherReport::Unavailable(ErrorRecord::for_location(location)),
        })
    }

    async fn fetch_forecast(
        &self,
        location: &str,
        days: u32,
        unit: Unit,
    ) -> Result<WeatherReport<Vec<ForecastEntry>>> {
        self.calls.lock().unwrap().push(WeatherCall::Forecast {
            location: location.to_string(),
            days,
            unit,
        });

        Ok(match self.forecast.get(location) {
            Some(entries) => {
                WeatherReport::Found(entries.iter().take(days as usize).cloned().collect())
            }
            None => WeatherReport::Unavailable(ErrorRecord::for_location(location)),
        })
    }
}
