//! Flat JSON document store.
//!
//! The whole collection is a single JSON array on disk. Every call re-reads
//! the file, so edits made by other processes are picked up immediately.
//! Writes rewrite the file in place; there is no temp-file rename, so a crash
//! in the middle of a write can leave a truncated document behind.

use super::models::VideoRecord;
use super::trait_def::VideoStore;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

pub struct JsonFileVideoStore {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl JsonFileVideoStore {
    /// Opens the document at `path`, creating an empty one if it does not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            info!("Creating empty spots document at {:?}", path);
            fs::write(&path, "[]")
                .with_context(|| format!("Failed to create spots document {:?}", path))?;
        }

        let store = JsonFileVideoStore {
            path,
            file_lock: Mutex::new(()),
        };
        let count = store.read_all()?.len();
        info!("Opened spots document {:?}: {} spots", store.path, count);
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.file_lock
            .lock()
            .map_err(|_| anyhow!("Spots document lock poisoned"))
    }

    fn read_all(&self) -> Result<Vec<VideoRecord>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read spots document {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse spots document {:?}", self.path))
    }

    fn write_all(&self, records: &[VideoRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write spots document {:?}", self.path))
    }
}

impl VideoStore for JsonFileVideoStore {
    fn list_all(&self) -> Result<Vec<VideoRecord>> {
        let _guard = self.lock()?;
        self.read_all()
    }

    fn get(&self, id: &str) -> Result<Option<VideoRecord>> {
        let _guard = self.lock()?;
        Ok(self.read_all()?.into_iter().find(|r| r.id == id))
    }

    fn put(&self, record: &VideoRecord) -> Result<()> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records)
    }

    fn delete(&self, id: &str) -> Result<Option<VideoRecord>> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        let Some(position) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(position);
        self.write_all(&records)?;
        Ok(Some(removed))
    }

    fn count(&self) -> Result<usize> {
        let _guard = self.lock()?;
        Ok(self.read_all()?.len())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
