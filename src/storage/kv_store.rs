//! String key-value persistence for session flags.
//!
//! Plays the role browser local storage plays for a web wallet: a flat map of
//! string keys to string values that survives restarts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key of the "previously connected" flag.
pub const WALLET_CONNECTED_KEY: &str = "walletConnected";

/// Synchronous by contract: `disconnect` is not async and must persist the flag
/// before returning. Implementations are expected to finish in well under a
/// millisecond (a few bytes of JSON), so callers on the runtime thread do not
/// hand them to `spawn_blocking`.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// On-disk layout of [`FileKeyValueStore`].
#[derive(Serialize, Deserialize, Debug, Default)]
struct StoredItems {
    items: BTreeMap<String, String>,
    /// Unix seconds of the last write.
    updated_at: i64,
}

/// JSON-file store. The whole map is rewritten on every change.
pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<StoredItems> {
        if !self.path.exists() {
            return Ok(StoredItems::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoredItems::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, mut stored: StoredItems) -> anyhow::Result<()> {
        stored.updated_at = chrono::Utc::now().timestamp();
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> anyhow::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("state file lock poisoned"))?;
        let mut stored = self.load()?;
        f(&mut stored.items);
        self.save(stored)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.modify(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.modify(|items| {
            items.remove(key);
        })
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> anyhow::Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}
