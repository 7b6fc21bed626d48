//! 测试基础设施
//!
//! 在不依赖真实 LLM / 天气服务的情况下测试 skywise 各组件。
//!
//! | 类型 | 用途 |
//! |------|------|
//! | [`MockChatModel`] | 替代真实模型，按顺序返回预设的文本或工具调用 |
//! | [`MockWeatherProvider`] | 替代 OpenWeatherMap，按地点返回预设记录 |
//!
//! - **零网络请求**：所有 Mock 都完全在内存中运行
//! - **可观测**：`call_count()` / `last_request()` / `calls()` 检查调用情况
//!
//! ```rust
//! use skywise::assistant::{AssistantConfig, WeatherAssistant};
//! use skywise::testing::{MockChatModel, MockWeatherProvider};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let model = Arc::new(
//!     MockChatModel::new()
//!         .with_tool_call("call_1", "get_current_weather", r#"{"location":"Colombo"}"#)
//!         .with_text("Hot and humid in Colombo."),
//! );
//! let provider = Arc::new(MockWeatherProvider::new().with_current(
//!     "Colombo",
//!     MockWeatherProvider::record("Colombo", "clear sky", 32.0, 85.0, 5.0),
//! ));
//!
//! let mut assistant = WeatherAssistant::new(AssistantConfig::new(), model, provider);
//! let answer = assistant.ask("What's the weather in Colombo?").await.unwrap();
//! assert_eq!(answer, "Hot and humid in Colombo. ☀️ 🔥 💦");
//! # }
//! ```

mod mock_llm;
mod mock_weather;

pub use mock_llm::{MockChatModel, RecordedRequest};
pub use mock_weather::{MockWeatherProvider, WeatherCall};
