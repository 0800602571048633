use crate::types::{ChatLookupRequest, ChatSession, Coordinates, RecordChatRequest, UserChatsRequest};

use super::client::ApiClient;
use super::error::ApiError;

const RECORD_CHAT: &str = "/LocationChatLedger/recordChat";
const GET_USER_CHATS: &str = "/LocationChatLedger/_getUserChats";
const GET_CHAT: &str = "/LocationChatLedger/_getChat";

/// 地点会话账本
#[derive(Clone)]
pub struct ChatService {
    client: ApiClient,
}

impl ChatService {
    pub fn new(client: ApiClient) -> Self {
        ChatService { client }
    }

    /// 记录一次会话，timestamp 由服务端分配
    pub async fn record_chat(
        &self,
        session_id: &str,
        user_id: &str,
        location: Coordinates,
        radius: f64,
        main_location: &str,
    ) -> Result<(), ApiError> {
        let request = RecordChatRequest {
            session_id: session_id.to_string(),
            user: user_id.to_string(),
            location,
            radius,
            main_location: main_location.to_string(),
        };
        self.client.post_unit(RECORD_CHAT, &request).await
    }

    /// 用户的全部会话，顺序与后端一致
    pub async fn get_user_chats(&self, user_id: &str) -> Result<Vec<ChatSession>, ApiError> {
        let request = UserChatsRequest {
            user: user_id.to_string(),
        };
        self.client.post(GET_USER_CHATS, &request).await
    }

    pub async fn get_chat(&self, session_id: &str, user_id: &str) -> Result<ChatSession, ApiError> {
        let request = ChatLookupRequest {
            session_id: session_id.to_string(),
            user: user_id.to_string(),
        };
        self.client.post(GET_CHAT, &request).await
    }
}
