use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiError, AuthService};
use crate::types::User;

use super::storage::KeyValueStorage;

pub const USER_ID_KEY: &str = "userId";
pub const USERNAME_KEY: &str = "username";

const LOGIN_FAILED: &str = "登录失败";
const REGISTER_FAILED: &str = "注册失败";
const CHANGE_PASSWORD_FAILED: &str = "修改密码失败";
const NOT_LOGGED_IN: &str = "未登录";

/// 认证操作的结果，失败时带可展示的错误消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub error: Option<String>,
}

impl AuthResult {
    pub fn ok() -> Self {
        AuthResult {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        AuthResult {
            success: false,
            error: Some(message.into()),
        }
    }

    fn from_error(error: &ApiError, fallback: &str) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            AuthResult::failed(fallback)
        } else {
            AuthResult::failed(message)
        }
    }
}

/// 会话状态：匿名（`user` 为空）或已登录
///
/// 启动时从持久化存储恢复身份，不做过期检查；
/// 只有 login / register / logout 会改变状态，且都不会向调用方返回错误。
pub struct SessionStore {
    auth: AuthService,
    storage: Arc<dyn KeyValueStorage>,
    user: Option<User>,
}

impl SessionStore {
    pub fn new(auth: AuthService, storage: Arc<dyn KeyValueStorage>) -> Self {
        let user = Self::restore(storage.as_ref());
        if let Some(user) = &user {
            info!(username = %user.username, "restored persisted session");
        }

        SessionStore { auth, storage, user }
    }

    fn restore(storage: &dyn KeyValueStorage) -> Option<User> {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted session");
                None
            }
        };

        // 两个字段必须同时存在
        match (read(USER_ID_KEY), read(USERNAME_KEY)) {
            (Some(user_id), Some(username)) => Some(User { user_id, username }),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> AuthResult {
        match self.auth.login(username, password).await {
            Ok(user_id) => {
                self.authenticate(user_id, username);
                AuthResult::ok()
            }
            Err(e) => {
                warn!(username, error = %e, "login failed");
                AuthResult::from_error(&e, LOGIN_FAILED)
            }
        }
    }

    pub async fn register(&mut self, username: &str, password: &str) -> AuthResult {
        match self.auth.register(username, password).await {
            Ok(user_id) => {
                self.authenticate(user_id, username);
                AuthResult::ok()
            }
            Err(e) => {
                warn!(username, error = %e, "registration failed");
                AuthResult::from_error(&e, REGISTER_FAILED)
            }
        }
    }

    /// 修改当前用户的密码，不改变会话状态
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> AuthResult {
        let Some(username) = self.username() else {
            return AuthResult::failed(NOT_LOGGED_IN);
        };

        match self
            .auth
            .change_password(username, old_password, new_password)
            .await
        {
            Ok(()) => AuthResult::ok(),
            Err(e) => AuthResult::from_error(&e, CHANGE_PASSWORD_FAILED),
        }
    }

    /// 无条件回到匿名状态并清除持久化身份
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "logged out");
        }

        for key in [USER_ID_KEY, USERNAME_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to clear persisted session");
            }
        }
    }

    fn authenticate(&mut self, user_id: String, username: &str) {
        info!(username, "authenticated");

        for (key, value) in [(USER_ID_KEY, user_id.as_str()), (USERNAME_KEY, username)] {
            if let Err(e) = self.storage.set(key, value) {
                warn!(key, error = %e, "failed to persist session");
            }
        }

        self.user = Some(User {
            user_id,
            username: username.to_string(),
        });
    }
}
