mod auth;
mod chat;
mod error;
mod geo;
mod history;

pub use auth::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User};
pub use chat::{ChatLookupRequest, ChatSession, RecordChatRequest, UserChatsRequest};
pub use error::{ApiErrorBody, ApiOutcome};
pub use geo::Coordinates;
pub use history::{
    AnswerQuestionRequest, AnswerResponse, ClearSessionRequest, GenerateContextRequest,
    HistoricalContext, HistoryChatRequest, HistoryChatResponse,
};
