use super::SessionStore;
use crate::api::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

const SESSION_FILE: &str = "session.json";

/// Session entries kept as a JSON object on disk. The whole file is
/// rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                ApiError::Storage(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ApiError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        debug!("Opened session store at {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// `STRUX_SESSION_FILE`, else `<data dir>/strux/session.json`.
    pub fn default_path() -> ApiResult<PathBuf> {
        if let Ok(path) = std::env::var("STRUX_SESSION_FILE") {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        dirs::data_dir()
            .map(|dir| dir.join("strux").join(SESSION_FILE))
            .ok_or_else(|| ApiError::Storage("No data directory on this platform".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ApiError::Storage("session store lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| ApiError::Storage(format!("Failed to encode session: {}", e)))?;
        // written beside the target, then renamed over it
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, text)
            .and_then(|()| std::fs::rename(&temp_path, &self.path))
            .map_err(|e| {
                warn!("Failed to write session file {}: {}", self.path.display(), e);
                let _ = std::fs::remove_file(&temp_path);
                ApiError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
