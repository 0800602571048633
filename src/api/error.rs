use thiserror::Error;

/// 调用后端时可能出现的错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 后端返回的 `{ "error": "..." }`，只保留消息本身
    #[error("{0}")]
    Service(String),

    /// 非 2xx 且没有结构化错误体
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("网络请求失败：{0}")]
    Transport(#[from] reqwest::Error),

    #[error("解析响应失败：{0}")]
    Decode(#[source] serde_json::Error),

    #[error("序列化请求体失败：{0}")]
    InvalidBody(#[source] serde_json::Error),
}

impl ApiError {
    /// 后端结构化错误的消息
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ApiError::Service(message) => Some(message),
            _ => None,
        }
    }
}
