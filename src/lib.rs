pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod store;
pub mod types;

pub use api::{ApiClient, ApiError, Services};
pub use app::{Exploration, Explorer};
pub use cli::run_cli;
pub use config::Config;
pub use store::{AuthResult, SessionStore};
