use super::SessionStore;
use crate::api::{ApiError, ApiResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ApiError::Storage("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{COMPANY_ID_KEY, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_ID_KEY};

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(TOKEN_KEY), None);

        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));

        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    #[test]
    fn clear_session_keeps_company() {
        let store = MemoryStore::with_entries([
            (TOKEN_KEY, "t"),
            (REFRESH_TOKEN_KEY, "r"),
            (USER_ID_KEY, "u-1"),
            (COMPANY_ID_KEY, "c-1"),
        ]);

        store.clear_session().unwrap();

        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
        assert_eq!(store.get(USER_ID_KEY), None);
        assert_eq!(store.get(COMPANY_ID_KEY).as_deref(), Some("c-1"));
    }
}
