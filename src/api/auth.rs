use crate::types::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest};

use super::client::ApiClient;
use super::error::ApiError;

const REGISTER: &str = "/UserAuthentication/register";
const LOGIN: &str = "/UserAuthentication/login";
const CHANGE_PASSWORD: &str = "/UserAuthentication/changePassword";

/// 用户认证服务；用户名和密码的格式只由后端校验
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        AuthService { client }
    }

    /// 注册，返回 userId
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.client.post(REGISTER, &request).await?;
        Ok(response.user_id)
    }

    /// 登录，返回 userId
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.client.post(LOGIN, &request).await?;
        Ok(response.user_id)
    }

    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let request = ChangePasswordRequest {
            username: username.to_string(),
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.post_unit(CHANGE_PASSWORD, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_unwraps_user_id() {
        let mock = MockTransport::new();
        mock.respond(json!({ "userId": "u1" }));
        let auth = AuthService::new(ApiClient::new(mock.clone()));

        let id = auth.login("alice", "secret").await.unwrap();

        assert_eq!(id, "u1");
        assert_eq!(
            mock.calls(),
            vec![(
                LOGIN.to_string(),
                Some(json!({ "username": "alice", "password": "secret" }))
            )]
        );
    }

    #[tokio::test]
    async fn test_register_uses_register_endpoint() {
        let mock = MockTransport::new();
        mock.respond(json!({ "userId": "u2" }));
        let auth = AuthService::new(ApiClient::new(mock.clone()));

        assert_eq!(auth.register("bob", "pw").await.unwrap(), "u2");
        assert_eq!(mock.calls()[0].0, REGISTER);
    }

    #[tokio::test]
    async fn test_change_password_body() {
        let mock = MockTransport::new();
        let auth = AuthService::new(ApiClient::new(mock.clone()));

        auth.change_password("alice", "old", "new").await.unwrap();

        assert_eq!(
            mock.calls()[0].1,
            Some(json!({ "username": "alice", "oldPassword": "old", "newPassword": "new" }))
        );
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let mock = MockTransport::new();
        mock.fail(ApiError::Service("Username taken".to_string()));
        let auth = AuthService::new(ApiClient::new(mock.clone()));

        let err = auth.register("alice", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Username taken");
    }
}
