pub mod auth;
pub mod chat;
pub mod client;
pub mod error;
pub mod history;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::AuthService;
pub use chat::ChatService;
pub use client::ApiClient;
pub use error::ApiError;
pub use history::HistoryService;
pub use transport::{HttpTransport, Transport};

/// 三个后端服务共用同一个 ApiClient
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub chat: ChatService,
    pub history: HistoryService,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Services {
            auth: AuthService::new(client.clone()),
            chat: ChatService::new(client.clone()),
            history: HistoryService::new(client),
        }
    }
}
