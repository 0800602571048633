use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::error::ApiError;
use super::transport::Transport;

/// 记录每次调用并按顺序返回预置响应
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<(String, Option<Value>)>>,
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(MockTransport::default())
    }

    pub fn respond(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn fail(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((endpoint.to_string(), body));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
