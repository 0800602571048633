use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::types::ApiErrorBody;

use super::error::ApiError;

/// 出站通信的唯一入口：POST 一个 JSON 请求体，返回解析后的 JSON
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError>;
}

/// 基于 reqwest 的 HTTP 实现
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = self.url(endpoint);

        let mut request = self.client.post(&url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // 带 error 字段的错误体统一成一条消息，其余信息丢弃
            if let Ok(value) = serde_json::from_str::<Value>(&text) {
                if let Some(body) = ApiErrorBody::from_value(&value) {
                    return Err(ApiError::Service(body.error));
                }
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(ApiError::Decode)
    }
}
