//! OpenWeatherMap `data/2.5` 客户端
//!
//! - `GET {base}/weather?q=&appid=&units=` 当前天气
//! - `GET {base}/forecast?q=&appid=&units=&cnt=` 3 小时一档的预报采样
//!
//! 只有 200 视为成功，其余状态码一律返回 [`ErrorRecord`]，不重试。

use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::weather::{
    ErrorRecord, ForecastEntry, ForecastSample, SAMPLES_PER_DAY, Unit, WeatherProvider,
    WeatherRecord, WeatherReport,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ── 接口原始响应 ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    sys: Sys,
    main: Main,
    wind: Wind,
    #[serde(default)]
    visibility: Option<f64>,
    weather: Vec<Condition>,
    clouds: Clouds,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    #[serde(default)]
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    main: SampleMain,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct SampleMain {
    temp: f64,
    humidity: f64,
}

fn first_description(weather: Vec<Condition>) -> Result<String> {
    weather
        .into_iter()
        .next()
        .map(|c| c.description)
        .ok_or_else(|| {
            WeatherError::InvalidResponse("missing weather[0].description".to_string()).into()
        })
}

impl CurrentResponse {
    fn into_record(self, unit: Unit) -> Result<WeatherRecord> {
        Ok(WeatherRecord {
            location: self.name,
            country: self.sys.country,
            temperature: self.main.temp,
            temperature_feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_gust: self.wind.gust,
            visibility: self.visibility,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            unit: unit.label().to_string(),
            description: first_description(self.weather)?,
            cloudiness: self.clouds.all,
            precipitation_probability: self.pop,
        })
    }
}

impl RawSample {
    fn into_sample(self) -> Result<ForecastSample> {
        Ok(ForecastSample {
            temperature: self.main.temp,
            humidity: self.main.humidity,
            description: first_description(self.weather)?,
        })
    }
}

/// 把预报采样按每 8 个一组切成 `days` 天
///
/// 第 i 组为 `samples[i*8 .. (i+1)*8]`，互不重叠。数据不足时末组按实际个数
/// 求平均，空组直接跳过，因此请求天数超过数据源窗口只会得到更少的条目。
pub fn summarize_forecast(samples: &[ForecastSample], days: u32) -> Vec<ForecastEntry> {
    samples
        .chunks(SAMPLES_PER_DAY)
        .take(days as usize)
        .zip(1..)
        .map(|(group, day)| {
            let count = group.len() as f64;
            ForecastEntry {
                day,
                temperature: group.iter().map(|s| s.temperature).sum::<f64>() / count,
                humidity: group.iter().map(|s| s.humidity).sum::<f64>() / count,
                description: group[0].description.clone(),
            }
        })
        .collect()
}

/// OpenWeatherMap HTTP 客户端
pub struct OpenWeatherClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(
        client: Arc<Client>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Arc<Client>, config: &Config) -> Self {
        Self::new(
            client,
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
        )
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "🌐 请求天气接口");

        let response = self
            .client
            .get(&url)
            .query(&[("appid", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::NetworkError(e.to_string()))?;
        Ok(response)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_current(
        &self,
        location: &str,
        unit: Unit,
    ) -> Result<WeatherReport<WeatherRecord>> {
        info!(location = %location, unit = %unit, "🌡️ 查询当前天气");

        let response = self
            .get(
                "weather",
                &[("q", location.to_string()), ("units", unit.to_string())],
            )
            .await?;

        if response.status() != StatusCode::OK {
            warn!(location = %location, status = %response.status(), "天气接口返回非 200");
            return Ok(WeatherReport::Unavailable(ErrorRecord::for_location(location)));
        }

        let body = response
            .json::<CurrentResponse>()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        Ok(WeatherReport::Found(body.into_record(unit)?))
    }

    async fn fetch_forecast(
        &self,
        location: &str,
        days: u32,
        unit: Unit,
    ) -> Result<WeatherReport<Vec<ForecastEntry>>> {
        let count = days.saturating_mul(SAMPLES_PER_DAY as u32);
        info!(location = %location, days, cnt = count, "📅 查询天气预报");

        let response = self
            .get(
                "forecast",
                &[
                    ("q", location.to_string()),
                    ("units", unit.to_string()),
                    ("cnt", count.to_string()),
                ],
            )
            .await?;

        if response.status() != StatusCode::OK {
            warn!(location = %location, status = %response.status(), "预报接口返回非 200");
            return Ok(WeatherReport::Unavailable(ErrorRecord::for_location(location)));
        }

        let body = response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        let samples = body
            .list
            .into_iter()
            .map(RawSample::into_sample)
            .collect::<Result<Vec<_>>>()?;
        debug!(location = %location, samples = samples.len(), "预报采样已解析");

        Ok(WeatherReport::Found(summarize_forecast(&samples, days)))
    }
}
