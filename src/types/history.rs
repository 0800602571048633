use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geo::Coordinates;

/// 为某个地点生成的历史背景叙述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalContext {
    pub context: String,
    pub main_location: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContextRequest {
    pub user: String,
    pub location: Coordinates,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestionRequest {
    pub session_id: String,
    pub user: String,
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearSessionRequest {
    pub session_id: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryChatRequest {
    pub user: String,
    pub main_location: String,
}

/// 历史对话响应：只校验 `context` 是列表，条目结构由后端决定
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryChatResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_chat_context_missing_or_null() {
        let missing: HistoryChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.context.is_empty());

        let null: HistoryChatResponse = serde_json::from_value(json!({ "context": null })).unwrap();
        assert!(null.context.is_empty());
    }

    #[test]
    fn test_history_chat_context_must_be_list() {
        let result = serde_json::from_value::<HistoryChatResponse>(json!({ "context": "text" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_bodies_use_wire_names() {
        let body = serde_json::to_value(AnswerQuestionRequest {
            session_id: "s1".to_string(),
            user: "u1".to_string(),
            question: "Who built this?".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "sessionId": "s1", "user": "u1", "question": "Who built this?" })
        );
    }
}
