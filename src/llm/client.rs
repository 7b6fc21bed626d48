use crate::config::Config;
use crate::error::{LlmError, Result, SkywiseError};
use crate::llm::ChatModel;
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ToolDefinition};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::debug;

/// 走 OpenAI 兼容 `/chat/completions` 接口的 [`ChatModel`] 实现
pub struct OpenAiChatModel {
    client: Arc<Client>,
    model: String,
    url: String,
    api_key: String,
}

impl OpenAiChatModel {
    pub fn new(
        client: Arc<Client>,
        model: impl Into<String>,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Arc<Client>, config: &Config) -> Self {
        Self::new(
            client,
            config.model.clone(),
            config.chat_url.clone(),
            config.openai_api_key.clone(),
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut header_map = HeaderMap::new();
        header_map.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key)
                .parse()
                .map_err(|e| SkywiseError::Other(format!("Invalid Authorization header: {}", e)))?,
        );
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(header_map)
    }

    async fn post(&self, request_body: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers()?)
            .json(request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status,
                message: error_text,
            }
            .into());
        }

        let completion_response = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        debug!(model = %self.model, "Post completion response: {:?}", completion_response);

        Ok(completion_response)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolDefinition>>,
        tool_choice: Option<String>,
    ) -> Result<Message> {
        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            tool_choice,
            temperature: None,
        };

        self.post(&request_body)
            .await?
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| LlmError::EmptyResponse.into())
    }
}
