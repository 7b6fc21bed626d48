mod client;
pub mod types;

pub use client::OpenAiChatModel;

use crate::error::Result;
use crate::llm::types::{Message, ToolDefinition};
use async_trait::async_trait;

/// 对话模型接口：提交完整消息历史（可选附带工具声明），取回第一条候选消息
///
/// 测试中由 [`crate::testing::MockChatModel`] 替代。
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolDefinition>>,
        tool_choice: Option<String>,
    ) -> Result<Message>;

    /// 不带工具的简单对话，返回模型的文本内容
    async fn chat_simple(&self, messages: Vec<Message>) -> Result<String> {
        self.complete(messages, None, None)
            .await?
            .content
            .ok_or_else(|| crate::error::LlmError::EmptyResponse.into())
    }
}
