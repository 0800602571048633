use serde_json::Value;

use crate::types::{
    AnswerQuestionRequest, AnswerResponse, ClearSessionRequest, Coordinates,
    GenerateContextRequest, HistoricalContext, HistoryChatRequest, HistoryChatResponse,
};

use super::client::ApiClient;
use super::error::ApiError;

const GENERATE_CONTEXT: &str = "/AIHistoricalContextAgent/generateContext";
const ANSWER_QUESTION: &str = "/AIHistoricalContextAgent/answerQuestion";
const CLEAR_SESSION: &str = "/AIHistoricalContextAgent/clearSession";
const GET_CHAT: &str = "/AIHistoricalContextAgent/_getChat";

/// 历史背景 AI 服务
#[derive(Clone)]
pub struct HistoryService {
    client: ApiClient,
}

impl HistoryService {
    pub fn new(client: ApiClient) -> Self {
        HistoryService { client }
    }

    pub async fn generate_context(
        &self,
        user_id: &str,
        location: Coordinates,
        radius: f64,
    ) -> Result<HistoricalContext, ApiError> {
        let request = GenerateContextRequest {
            user: user_id.to_string(),
            location,
            radius,
        };
        self.client.post(GENERATE_CONTEXT, &request).await
    }

    /// 返回 `answer` 字段本身
    pub async fn answer_question(
        &self,
        session_id: &str,
        user_id: &str,
        question: &str,
    ) -> Result<String, ApiError> {
        let request = AnswerQuestionRequest {
            session_id: session_id.to_string(),
            user: user_id.to_string(),
            question: question.to_string(),
        };
        let response: AnswerResponse = self.client.post(ANSWER_QUESTION, &request).await?;
        Ok(response.answer)
    }

    pub async fn clear_session(&self, session_id: &str, user_id: &str) -> Result<(), ApiError> {
        let request = ClearSessionRequest {
            session_id: session_id.to_string(),
            user: user_id.to_string(),
        };
        self.client.post_unit(CLEAR_SESSION, &request).await
    }

    /// 按 (userId, mainLocation) 取回该地点的对话上下文
    pub async fn get_chat(&self, user_id: &str, main_location: &str) -> Result<Vec<Value>, ApiError> {
        let request = HistoryChatRequest {
            user: user_id.to_string(),
            main_location: main_location.to_string(),
        };
        let response: HistoryChatResponse = self.client.post(GET_CHAT, &request).await?;
        Ok(response.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_answer_question_returns_bare_string() {
        let mock = MockTransport::new();
        mock.respond(json!({ "answer": "Emperor Vespasian began it in 72 AD." }));
        let history = HistoryService::new(ApiClient::new(mock.clone()));

        let answer = history.answer_question("s1", "u1", "Who built this?").await.unwrap();

        assert_eq!(answer, "Emperor Vespasian began it in 72 AD.");
        assert_eq!(
            mock.calls()[0],
            (
                ANSWER_QUESTION.to_string(),
                Some(json!({ "sessionId": "s1", "user": "u1", "question": "Who built this?" }))
            )
        );
    }

    #[tokio::test]
    async fn test_generate_context() {
        let mock = MockTransport::new();
        mock.respond(json!({
            "context": "Built under the Flavian dynasty...",
            "mainLocation": "Colosseum",
            "sessionId": "s9"
        }));
        let history = HistoryService::new(ApiClient::new(mock.clone()));

        let context = history
            .generate_context("u1", Coordinates::new(41.8902, 12.4922), 250.0)
            .await
            .unwrap();

        assert_eq!(context.session_id, "s9");
        assert_eq!(context.main_location, "Colosseum");
        assert_eq!(
            mock.calls()[0].1,
            Some(json!({ "user": "u1", "location": { "lat": 41.8902, "lng": 12.4922 }, "radius": 250.0 }))
        );
    }

    #[tokio::test]
    async fn test_clear_session() {
        let mock = MockTransport::new();
        let history = HistoryService::new(ApiClient::new(mock.clone()));

        history.clear_session("s1", "u1").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![(CLEAR_SESSION.to_string(), Some(json!({ "sessionId": "s1", "user": "u1" })))]
        );
    }

    #[tokio::test]
    async fn test_get_chat_unwraps_context_list() {
        let mock = MockTransport::new();
        mock.respond(json!({
            "context": [
                { "role": "user", "content": "Who built this?" },
                { "role": "assistant", "content": "Vespasian." }
            ]
        }));
        let history = HistoryService::new(ApiClient::new(mock.clone()));

        let entries = history.get_chat("u1", "Colosseum").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["content"], "Vespasian.");
        assert_eq!(
            mock.calls()[0].1,
            Some(json!({ "user": "u1", "mainLocation": "Colosseum" }))
        );
    }
}
