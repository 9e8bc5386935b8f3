//! Host-local persistent key/value storage
//!
//! Used once per resolution to get-or-generate the local user id. The file
//! backend keeps a flat JSON object under the user's data directory.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::constants;

/// Minimal string key/value store provided by the host
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed storage
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Storage at the default location (`<data dir>/ritzy/local-storage.json`)
    pub fn open_default() -> Self {
        Self::at(Self::default_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::storage::APP_DIR);
        path.push(constants::storage::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read local storage: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse local storage: {}", self.path.display()))
    }
}

impl LocalStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match self.read_all() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                warn!(path = %self.path.display(), error = ?e, "Ignoring unreadable local storage");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_all().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = ?e, "Overwriting unreadable local storage");
            BTreeMap::new()
        });
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(&items)
            .context("Failed to serialize local storage to JSON")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write local storage to {}", self.path.display()))?;

        debug!(key = %key, path = %self.path.display(), "Persisted local storage item");
        Ok(())
    }
}

/// Return the persisted local user id, generating and persisting one if absent
pub fn local_user_id(storage: &dyn LocalStorage) -> String {
    let key = constants::user::LOCAL_USER_KEY;
    if let Some(existing) = storage.get_item(key) {
        debug!(user_id = %existing, "Reusing persisted local user id");
        return existing;
    }

    let generated = generate_user_id();
    if let Err(e) = storage.set_item(key, &generated) {
        warn!(error = ?e, user_id = %generated, "Failed to persist generated user id");
    } else {
        info!(user_id = %generated, "Generated local user id");
    }
    generated
}

fn generate_user_id() -> String {
    let n = fastrand::u32(0..constants::user::ID_RANGE);
    format!("{}{:x}", constants::user::ID_PREFIX, n)
}
