use crate::error::{Result, ToolError};
use crate::llm::types::ToolDefinition;
use crate::tools::ToolParameters;
use crate::weather::{ForecastEntry, Unit, WeatherProvider, WeatherRecord, WeatherReport};
use serde_json::{Value, json};
use tracing::debug;

/// 模型可以调用的天气工具，集合固定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTool {
    CurrentWeather,
    Forecast,
}

impl WeatherTool {
    pub const ALL: [WeatherTool; 2] = [WeatherTool::CurrentWeather, WeatherTool::Forecast];

    pub fn name(&self) -> &'static str {
        match self {
            WeatherTool::CurrentWeather => "get_current_weather",
            WeatherTool::Forecast => "get_weather_forecast",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherTool::CurrentWeather => "Get the current weather in a given location",
            WeatherTool::Forecast => {
                "Get a day-by-day weather forecast for a given location, averaged per day"
            }
        }
    }

    /// 工具参数的 JSON Schema 定义
    pub fn parameters(&self) -> Value {
        match self {
            WeatherTool::CurrentWeather => json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name, e.g., Colombo"
                    },
                    "unit": {"type": "string", "enum": ["metric", "imperial"]}
                },
                "required": ["location"]
            }),
            WeatherTool::Forecast => json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name, e.g., Colombo"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to forecast, e.g., 3"
                    },
                    "unit": {"type": "string", "enum": ["metric", "imperial"]}
                },
                "required": ["location", "days"]
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.parameters())
    }

    /// 每次对话请求附带的完整工具声明
    pub fn definitions() -> Vec<ToolDefinition> {
        Self::ALL.iter().map(WeatherTool::definition).collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }
}

/// 解析后的工具调用
///
/// 模型传入的 `unit` 参数会被忽略，实际单位以会话设置为准。
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    CurrentWeather { location: String },
    Forecast { location: String, days: u32 },
}

/// 工具执行结果，保留类型以便后续标注 emoji
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Current(WeatherReport<WeatherRecord>),
    Forecast(WeatherReport<Vec<ForecastEntry>>),
}

fn required_str(parameters: &ToolParameters, name: &str) -> Result<String> {
    parameters
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ToolError::MissingParameter(name.to_string()).into())
}

fn required_days(parameters: &ToolParameters) -> Result<u32> {
    let value = parameters
        .get("days")
        .ok_or_else(|| ToolError::MissingParameter("days".to_string()))?;

    value
        .as_u64()
        .and_then(|days| u32::try_from(days).ok())
        .ok_or_else(|| {
            ToolError::InvalidParameter {
                name: "days".to_string(),
                message: format!("expected a non-negative integer, got {}", value),
            }
            .into()
        })
}

impl ToolRequest {
    /// 由模型返回的工具名和 JSON 参数字符串构建请求
    pub fn parse(name: &str, arguments: &str) -> Result<Self> {
        let tool = WeatherTool::from_name(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let parameters: ToolParameters = serde_json::from_str(arguments)?;
        debug!(tool = name, ?parameters, "解析工具参数");

        match tool {
            WeatherTool::CurrentWeather => Ok(ToolRequest::CurrentWeather {
                location: required_str(&parameters, "location")?,
            }),
            WeatherTool::Forecast => Ok(ToolRequest::Forecast {
                location: required_str(&parameters, "location")?,
                days: required_days(&parameters)?,
            }),
        }
    }

    pub fn tool(&self) -> WeatherTool {
        match self {
            ToolRequest::CurrentWeather { .. } => WeatherTool::CurrentWeather,
            ToolRequest::Forecast { .. } => WeatherTool::Forecast,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            ToolRequest::CurrentWeather { location } | ToolRequest::Forecast { location, .. } => {
                location
            }
        }
    }

    pub async fn execute(&self, provider: &dyn WeatherProvider, unit: Unit) -> Result<ToolOutcome> {
        match self {
            ToolRequest::CurrentWeather { location } => Ok(ToolOutcome::Current(
                provider.fetch_current(location, unit).await?,
            )),
            ToolRequest::Forecast { location, days } => Ok(ToolOutcome::Forecast(
                provider.fetch_forecast(location, *days, unit).await?,
            )),
        }
    }
}
