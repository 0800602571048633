use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::types::{ApiErrorBody, ApiOutcome};

use super::error::ApiError;
use super::transport::{HttpTransport, Transport};

/// 类型化的 POST 客户端，所有服务共享同一个 Transport
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ApiClient { transport }
    }

    /// 以 base_url 创建 HTTP 客户端
    pub fn http(base_url: &str) -> Result<Self, ApiError> {
        Ok(ApiClient::new(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// POST 并把响应解码为 `T`；形状不符即 `ApiError::Decode`
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ApiError::InvalidBody)?;
        let value = self.post_raw(endpoint, Some(body)).await?;

        match ApiOutcome::<T>::from_value(value).map_err(ApiError::Decode)? {
            ApiOutcome::Success(response) => Ok(response),
            ApiOutcome::Error(body) => Err(ApiError::Service(body.error)),
        }
    }

    /// POST 并忽略响应体
    pub async fn post_unit<B>(&self, endpoint: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ApiError::InvalidBody)?;
        let value = self.post_raw(endpoint, Some(body)).await?;

        if let Some(body) = ApiErrorBody::from_value(&value) {
            return Err(ApiError::Service(body.error));
        }
        Ok(())
    }

    /// 原始 JSON 进出，请求体可省略
    pub async fn post_raw(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError> {
        debug!(endpoint, "POST");
        let result = self.transport.post(endpoint, body).await;
        if let Err(e) = &result {
            debug!(endpoint, error = %e, "POST failed");
        }
        result
    }
}
