use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// 后端返回的结构化错误 `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// 只有对象且带字符串 `error` 字段才算结构化错误
    pub fn from_value(value: &Value) -> Option<Self> {
        value
            .as_object()
            .and_then(|obj| obj.get("error"))
            .and_then(|v| v.as_str())
            .map(|error| ApiErrorBody {
                error: error.to_string(),
            })
    }
}

/// 成功 / 错误二选一的响应
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Error(ApiErrorBody),
}

impl<T: DeserializeOwned> ApiOutcome<T> {
    /// 先识别错误形状，再按期望类型解码
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if let Some(body) = ApiErrorBody::from_value(&value) {
            return Ok(ApiOutcome::Error(body));
        }
        serde_json::from_value(value).map(ApiOutcome::Success)
    }
}

impl<T> ApiOutcome<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiOutcome::Error(_))
    }

    pub fn into_result(self) -> Result<T, ApiErrorBody> {
        match self {
            ApiOutcome::Success(value) => Ok(value),
            ApiOutcome::Error(body) => Err(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnswerResponse;
    use serde_json::json;

    #[test]
    fn test_error_shape_is_narrowed() {
        let outcome =
            ApiOutcome::<AnswerResponse>::from_value(json!({ "error": "Session not found" })).unwrap();
        assert!(outcome.is_error());
        assert_eq!(outcome.into_result().unwrap_err().error, "Session not found");
    }

    #[test]
    fn test_success_shape_passes_through() {
        let outcome = ApiOutcome::<AnswerResponse>::from_value(json!({ "answer": "Romans" })).unwrap();
        assert!(!outcome.is_error());
        assert_eq!(outcome.into_result().unwrap().answer, "Romans");
    }

    #[test]
    fn test_non_string_error_field_is_not_an_error() {
        assert!(ApiErrorBody::from_value(&json!({ "error": 42 })).is_none());
        assert!(ApiErrorBody::from_value(&json!(["error"])).is_none());
    }
}
