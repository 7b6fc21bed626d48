//! Mock 对话模型，用于在不发起真实 HTTP 请求的情况下测试依赖 [`ChatModel`] 的组件。
//!
//! # 示例
//!
//! ```rust
//! use skywise::testing::MockChatModel;
//! use skywise::llm::ChatModel;
//! use skywise::llm::types::Message;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockChatModel::new()
//!     .with_tool_call("call_1", "get_current_weather", r#"{"location":"Colombo"}"#)
//!     .with_text("It is sunny in Colombo.");
//!
//! let first = mock.complete(vec![Message::user("weather?")], None, None).await.unwrap();
//! assert_eq!(first.requested_tool_calls().len(), 1);
//!
//! let second = mock.chat_simple(vec![Message::user("weather?")]).await.unwrap();
//! assert_eq!(second, "It is sunny in Colombo.");
//! assert_eq!(mock.call_count(), 2);
//! # }
//! ```

use crate::error::{LlmError, Result, SkywiseError};
use crate::llm::ChatModel;
use crate::llm::types::{Message, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 预设响应（消息或错误）
enum MockChatResponse {
    Message(Message),
    Err(SkywiseError),
}

/// 一次 `complete` 调用收到的全部参数
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tools: Option<Vec<ToolDefinition>>,
    pub tool_choice: Option<String>,
}

/// 可脚本化的 Mock 对话模型。
///
/// 按顺序返回预设的响应；队列耗尽后返回 `EmptyResponse` 错误。
pub struct MockChatModel {
    responses: Arc<Mutex<VecDeque<MockChatResponse>>>,
    /// 每次调用时收到的请求，按顺序记录
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatModel {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 追加一条完整的 assistant 消息
    pub fn with_message(self, message: Message) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockChatResponse::Message(message));
        self
    }

    /// 追加一条纯文本回复
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_message(Message::assistant(text))
    }

    /// 追加一条只含单个工具调用的回复
    pub fn with_tool_call(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.with_tool_calls(vec![ToolCall::function(id, name, arguments)])
    }

    /// 追加一条包含多个工具调用的回复
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.with_message(Message::assistant_with_tools(calls))
    }

    /// 追加一条错误响应（用于测试错误处理路径）
    pub fn with_error(self, err: SkywiseError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockChatResponse::Err(err));
        self
    }

    /// 追加一条 API 错误（常用的便捷方法）
    pub fn with_api_error(self, status: u16, message: impl Into<String>) -> Self {
        self.with_error(SkywiseError::Llm(LlmError::ApiError {
            status,
            message: message.into(),
        }))
    }

    /// 已发生的调用总次数
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 最后一次调用的请求（若从未调用则返回 `None`）
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// 所有历史调用（按时序排列）
    pub fn all_requests(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// 剩余未消费的预设响应数量
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolDefinition>>,
        tool_choice: Option<String>,
    ) -> Result<Message> {
        self.calls.lock().unwrap().push(RecordedRequest {
            messages,
            tools,
            tool_choice,
        });

        match self.responses.lock().unwrap().pop_front() {
            Some(MockChatResponse::Message(message)) => Ok(message),
            Some(MockChatResponse::Err(e)) => Err(e),
            None => Err(SkywiseError::Llm(LlmError::EmptyResponse)),
        }
    }
}
