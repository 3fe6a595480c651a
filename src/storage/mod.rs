pub mod file;
pub mod memory;

use crate::api::ApiResult;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_ID_KEY: &str = "userId";
pub const COMPANY_ID_KEY: &str = "companyId";

/// Key/value storage backing the persisted session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> ApiResult<()>;

    fn remove(&self, key: &str) -> ApiResult<()>;

    /// Drops everything a signed-in session leaves behind.
    fn clear_session(&self) -> ApiResult<()> {
        for key in [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY] {
            self.remove(key)?;
        }
        Ok(())
    }
}
