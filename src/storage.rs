use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub mod keys {
    pub const PROJECTS: &str = "projects";
    pub const COMPLETED_PROJECTS: &str = "completed-projects";
    pub const ACTIVE_PROJECT_ID: &str = "activeProjectId";
    pub const SESSION_START_PREFIX: &str = "sessionStart-";
    pub const STREAK_COUNT: &str = "streak-count";
    pub const LAST_ACTIVE_DAY: &str = "last-active-day";
    pub const CALENDAR_EVENTS: &str = "calendar-events";
    pub const TODOS: &str = "todos";
    pub const DAILY_GOALS: &str = "daily-goals";
    pub const DAILY_PROGRESS: &str = "daily-progress";
    pub const THEME: &str = "theme";
    pub const USER: &str = "dreamflow_user";

    pub fn session_start(project_id: &str) -> String {
        format!("{SESSION_START_PREFIX}{project_id}")
    }
}

/// Independent JSON values kept in one file, written back whole.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl KvStore {
    pub fn in_memory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub async fn open(path: &Path) -> Self {
        let entries = match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse data file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read data file: {err}");
                BTreeMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Missing or unreadable values come back as `None`.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(key, "ignoring malformed stored value: {err}");
                None
            }
        }
    }

    pub fn get<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get_opt(key).unwrap_or_default()
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .keys()
            .filter(move |key| key.starts_with(prefix))
            .map(String::as_str)
    }

    pub async fn flush(&self) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}
