//! 从自由文本中提取城市名
//!
//! 单次请求模型，要求以 `", "` 分隔返回城市列表，然后按原样切分。
//! 不校验模型是否遵守格式。

use crate::error::Result;
use crate::llm::ChatModel;
use crate::llm::types::Message;
use std::sync::Arc;
use tracing::{debug, info};

pub const EXTRACTOR_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts city names.";

pub struct CityExtractor {
    model: Arc<dyn ChatModel>,
}

impl CityExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn prompt(input_text: &str) -> String {
        format!(
            "Extract all city names from the following input: '{}'. \
             Return the city names as a comma-separated list.",
            input_text
        )
    }

    pub async fn extract_cities(&self, input_text: &str) -> Result<Vec<String>> {
        let messages = vec![
            Message::system(EXTRACTOR_SYSTEM_PROMPT),
            Message::user(Self::prompt(input_text)),
        ];

        let reply = self.model.chat_simple(messages).await?;
        debug!(reply = %reply, "城市提取原始回复");

        let cities = split_city_list(&reply);
        info!(count = cities.len(), "🏙️ 提取到城市");
        Ok(cities)
    }
}

/// 去掉首尾空白后按 `", "` 切分
pub fn split_city_list(reply: &str) -> Vec<String> {
    reply.trim().split(", ").map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChatModel;

    #[test]
    fn test_split_city_list() {
        assert_eq!(
            split_city_list("  New York, Tokyo, London\n"),
            vec!["New York", "Tokyo", "London"]
        );
        // 格式不符时不做修正
        assert_eq!(split_city_list("Paris,Berlin"), vec!["Paris,Berlin"]);
        assert_eq!(split_city_list(""), vec![""]);
    }

    #[tokio::test]
    async fn test_extract_cities_prompt_and_split() {
        let mock = Arc::new(MockChatModel::new().with_text("Colombo, Kandy"));
        let extractor = CityExtractor::new(mock.clone());

        let cities = extractor
            .extract_cities("Is it raining in Colombo or Kandy today?")
            .await
            .unwrap();
        assert_eq!(cities, vec!["Colombo", "Kandy"]);

        assert_eq!(mock.call_count(), 1);
        let request = mock.last_request().unwrap();
        assert!(request.tools.is_none());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(
            request.messages[0].content.as_deref(),
            Some(EXTRACTOR_SYSTEM_PROMPT)
        );
        assert_eq!(
            request.messages[1].content.as_deref(),
            Some(
                "Extract all city names from the following input: \
                 'Is it raining in Colombo or Kandy today?'. \
                 Return the city names as a comma-separated list."
            )
        );
    }

    #[tokio::test]
    async fn test_extract_cities_empty_reply_is_error() {
        let mock = Arc::new(MockChatModel::new().with_message(Message {
            role: crate::llm::types::Role::Assistant,
            content: None,
            ..Default::default()
        }));
        let extractor = CityExtractor::new(mock);
        assert!(extractor.extract_cities("nothing here").await.is_err());
    }
}
