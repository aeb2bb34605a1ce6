use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::common::{ensure_dir_exists, read_file};

/// Key → JSON text storage for the normalized collections,
/// e.g. "old_taz_geojson", "new_taz_geojson", "blocks_geojson".
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<String>;
    fn has(&self, key: &str) -> bool;
    fn put(&mut self, key: &str, json: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Disk-backed store: one `<root>/<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    #[inline] pub fn root(&self) -> &PathBuf { &self.root }

    fn full(&self, key: &str) -> PathBuf { self.root.join(format!("{key}.json")) }
}

impl Store for DiskStore {
    fn get(&self, key: &str) -> Result<String> {
        let bytes = read_file(&self.full(key))?;
        String::from_utf8(bytes).with_context(|| format!("[DiskStore.get] {key} is not UTF-8"))
    }

    fn has(&self, key: &str) -> bool { self.full(key).is_file() }

    fn put(&mut self, key: &str, json: &str) -> Result<()> {
        ensure_dir_exists(&self.root)?;
        let path = self.full(key);
        std::fs::write(&path, json)
            .with_context(|| format!("[DiskStore.put] Failed to write {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.full(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("[DiskStore.remove] Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    pub(crate) entries: HashMap<String, String>,
}

impl MemStore {
    pub fn new(entries: HashMap<String, String>) -> Self { Self { entries } }
}

impl Store for MemStore {
    fn get(&self, key: &str) -> Result<String> {
        self.entries.get(key).cloned()
            .ok_or_else(|| anyhow!("[MemStore.get] missing entry: {key}"))
    }

    fn has(&self, key: &str) -> bool { self.entries.contains_key(key) }

    fn put(&mut self, key: &str, json: &str) -> Result<()> {
        self.entries.insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
