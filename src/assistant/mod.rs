//! 天气问答编排
//!
//! 每个问题走三步：
//! 1. 把问题连同工具声明发给模型（`tool_choice = "auto"`）
//! 2. 模型请求工具时逐个执行，结果标注 emoji 后以 `tool` 消息写回历史
//! 3. 不带工具再请求一次，拿到最终回答
//!
//! 第一步模型没有请求任何工具时，直接返回 [`NO_TOOL_CALL_REPLY`]，
//! 模型自己给出的文本不会透传。

mod conversation;

pub use conversation::Conversation;

use crate::config::Config;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::llm::types::Message;
use crate::tools::{ToolOutcome, ToolRequest, WeatherTool};
use crate::weather::enrich::{Conditions, DEFAULT_EMOJI, enrich};
use crate::weather::{Unit, WeatherProvider, WeatherReport};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 模型没有请求工具时的固定回复
pub const NO_TOOL_CALL_REPLY: &str = "Sorry, I couldn't process your request. 😔";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant specializing in weather information. \
Your responses should be clear, engaging, and tailored to help users plan their day effectively. \
Follow these guidelines: \
- Use appropriate emojis to represent weather conditions (e.g., ☀️ for sunny, 🌧️ for rain, ☁️ for cloudy, ❄️ for snow, ⛈️ for thunderstorms, 🌫️ for fog). \
- Provide actionable insights and practical advice based on the weather data. For example, suggest clothing, activities, or precautions. \
- Leverage all available weather data (e.g., temperature, humidity, wind speed, visibility, sunrise/sunset times) to craft detailed, human-friendly responses. \
- Tailor your tone and recommendations to the user's query and context. \
- Ensure your response is easy to read by using bullet points, short sentences, and clear language.";

/// 会话级设置
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    system_prompt: String,
    /// 所有工具调用统一使用的单位
    unit: Unit,
    /// 是否在回答末尾追加 emoji
    use_emojis: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            unit: Unit::default(),
            use_emojis: true,
        }
    }
}

impl AssistantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .unit(config.unit)
            .use_emojis(config.use_emojis)
    }

    pub fn system_prompt(mut self, system_prompt: &str) -> Self {
        self.system_prompt = system_prompt.to_string();
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn use_emojis(mut self, use_emojis: bool) -> Self {
        self.use_emojis = use_emojis;
        self
    }
}

/// 单个用户会话，独占自己的消息历史
pub struct WeatherAssistant {
    config: AssistantConfig,
    history: Conversation,
    model: Arc<dyn ChatModel>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherAssistant {
    pub fn new(
        config: AssistantConfig,
        model: Arc<dyn ChatModel>,
        provider: Arc<dyn WeatherProvider>,
    ) -> Self {
        let history = Conversation::with_system_prompt(config.system_prompt.clone());
        Self {
            config,
            history,
            model,
            provider,
        }
    }

    pub fn history(&self) -> &[Message] {
        self.history.messages()
    }

    pub fn unit(&self) -> Unit {
        self.config.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.config.unit = unit;
    }

    pub fn set_use_emojis(&mut self, use_emojis: bool) {
        self.config.use_emojis = use_emojis;
    }

    /// 回答一个问题
    ///
    /// 本轮产生的消息先暂存，成功后才整体写入历史；任何一步失败时历史保持
    /// 提问前的状态，会话可以继续使用。
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        info!(unit = %self.config.unit, "🧠 收到天气问题");
        debug!(question = %question, "📋 用户问题");
        let mut turn = vec![Message::user(question)];

        let reply = self
            .model
            .complete(
                self.request_messages(&turn),
                Some(WeatherTool::definitions()),
                Some("auto".to_string()),
            )
            .await?;

        let tool_calls = reply.requested_tool_calls().to_vec();
        if tool_calls.is_empty() {
            warn!("模型没有请求工具调用，返回固定提示");
            self.history.extend(turn);
            return Ok(NO_TOOL_CALL_REPLY.to_string());
        }

        // 带 tool_calls 的 assistant 消息必须排在对应的 tool 消息之前
        turn.push(reply);

        let mut last_emoji = None;
        for call in &tool_calls {
            info!(tool = %call.function.name, id = %call.id, "🚀 调用工具");
            let request = ToolRequest::parse(&call.function.name, &call.function.arguments)?;
            let outcome = request
                .execute(self.provider.as_ref(), self.config.unit)
                .await?;

            let (content, emoji) = annotate(&outcome)?;
            debug!(tool = %call.function.name, result = %content, "📤 工具结果");
            last_emoji = emoji;

            turn.push(Message::tool_result(&call.id, request.tool().name(), content));
        }

        let messages = self.request_messages(&turn);
        info!(messages = messages.len(), "📝 汇总工具结果生成回答");
        let answer = self.model.chat_simple(messages).await?;
        turn.push(Message::assistant(answer.clone()));
        self.history.extend(turn);

        if self.config.use_emojis {
            let emoji = last_emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string());
            Ok(format!("{} {}", answer, emoji))
        } else {
            Ok(answer)
        }
    }

    /// 已提交的历史加上本轮暂存的消息
    fn request_messages(&self, turn: &[Message]) -> Vec<Message> {
        let mut messages = self.history.snapshot();
        messages.extend_from_slice(turn);
        messages
    }
}

/// 序列化工具结果并附上 emoji
///
/// 返回 (交给模型的 JSON 文本, 该结果的代表 emoji)。错误记录原样返回，没有 emoji；
/// 预报取第一天的 emoji 作为代表。
pub fn annotate(outcome: &ToolOutcome) -> Result<(String, Option<String>)> {
    match outcome {
        ToolOutcome::Current(WeatherReport::Found(record)) => {
            let emoji = enrich(&Conditions::from(record));
            let mut value = serde_json::to_value(record)?;
            value["emoji"] = json!(emoji);
            Ok((value.to_string(), Some(emoji)))
        }
        ToolOutcome::Forecast(WeatherReport::Found(entries)) => {
            let mut headline = None;
            let mut days = Vec::with_capacity(entries.len());
            for entry in entries {
                let emoji = enrich(&Conditions::from(entry));
                let mut value = serde_json::to_value(entry)?;
                value["emoji"] = json!(emoji);
                headline.get_or_insert(emoji);
                days.push(value);
            }
            Ok((Value::Array(days).to_string(), headline))
        }
        ToolOutcome::Current(report @ WeatherReport::Unavailable(_)) => {
            Ok((serde_json::to_string(report)?, None))
        }
        ToolOutcome::Forecast(report @ WeatherReport::Unavailable(_)) => {
            Ok((serde_json::to_string(report)?, None))
        }
    }
}
