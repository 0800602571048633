use serde::{Deserialize, Serialize};

use super::geo::Coordinates;

/// 一次以地点和半径为锚点的会话记录，由服务端创建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub session_id: String,
    pub user: String,
    pub location: Coordinates,
    pub radius: f64,
    pub main_location: String,
    /// 服务端分配，原样保留
    pub timestamp: String,
}

/// recordChat 请求体（timestamp 由服务端分配）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChatRequest {
    pub session_id: String,
    pub user: String,
    pub location: Coordinates,
    pub radius: f64,
    pub main_location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserChatsRequest {
    pub user: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLookupRequest {
    pub session_id: String,
    pub user: String,
}
