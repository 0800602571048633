mod session;
mod storage;

pub use session::{AuthResult, SessionStore, USER_ID_KEY, USERNAME_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
