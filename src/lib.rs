pub mod assistant;
pub mod cities;
pub mod config;
pub mod error;
pub mod llm;
pub mod testing;
pub mod tools;
pub mod weather;

pub mod prelude {
    pub use crate::assistant::{AssistantConfig, NO_TOOL_CALL_REPLY, WeatherAssistant};
    pub use crate::cities::CityExtractor;
    pub use crate::config::Config;
    pub use crate::error::Result;
    pub use crate::llm::{ChatModel, OpenAiChatModel};
    pub use crate::weather::{OpenWeatherClient, Unit, WeatherProvider};
}
