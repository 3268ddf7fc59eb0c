//! The catalog gateway: validated CRUD, derived listings and search on top
//! of a [`VideoStore`].
//!
//! All mutations run under a single writer lock, so a read-merge-write in
//! `update` can't interleave with another writer.

use crate::query::{self, QueryAttribute, UnknownAttribute};
use crate::video_store::{
    complete_new_record, validate_record, NewVideoRecord, ValidationError, VideoRecord,
    VideoRecordPatch, VideoStore,
};
use anyhow::anyhow;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

pub const DEFAULT_MOST_VIEWED_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Spot '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    InvalidQuery(#[from] UnknownAttribute),
    #[error("Spot with id '{0}' already exists")]
    Conflict(String),
    #[error("Storage unavailable: {0:#}")]
    Storage(anyhow::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn storage_failure(operation: &str, err: anyhow::Error) -> CatalogError {
    error!("Storage failure during {}: {:#}", operation, err);
    CatalogError::Storage(err)
}

pub struct Catalog {
    store: Arc<dyn VideoStore>,
    writer: Mutex<()>,
}

impl Catalog {
    pub fn new(store: Arc<dyn VideoStore>) -> Catalog {
        Catalog {
            store,
            writer: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    fn lock_writer(&self) -> CatalogResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| storage_failure("lock", anyhow!("Catalog writer lock poisoned")))
    }

    pub fn count(&self) -> CatalogResult<usize> {
        self.store.count().map_err(|e| storage_failure("count", e))
    }

    pub fn list(&self) -> CatalogResult<Vec<VideoRecord>> {
        self.store.list_all().map_err(|e| storage_failure("list", e))
    }

    pub fn get(&self, id: &str) -> CatalogResult<VideoRecord> {
        self.store
            .get(id)
            .map_err(|e| storage_failure("get", e))?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn create(&self, new: NewVideoRecord) -> CatalogResult<VideoRecord> {
        let id = match &new.id {
            Some(id) if id.trim().is_empty() => {
                return Err(ValidationError::EmptyField { field: "id" }.into())
            }
            Some(id) => id.clone(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let record = complete_new_record(id, new)?;

        let _writer = self.lock_writer()?;
        if self
            .store
            .get(&record.id)
            .map_err(|e| storage_failure("create", e))?
            .is_some()
        {
            return Err(CatalogError::Conflict(record.id));
        }
        self.store
            .put(&record)
            .map_err(|e| storage_failure("create", e))?;

        info!("Created spot {} ({})", record.id, record.title);
        Ok(record)
    }

    pub fn update(&self, id: &str, patch: VideoRecordPatch) -> CatalogResult<VideoRecord> {
        let _writer = self.lock_writer()?;
        let mut record = self
            .store
            .get(id)
            .map_err(|e| storage_failure("update", e))?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        patch.apply_to(&mut record);
        validate_record(&record)?;
        self.store
            .put(&record)
            .map_err(|e| storage_failure("update", e))?;

        info!("Updated spot {}", id);
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> CatalogResult<VideoRecord> {
        let _writer = self.lock_writer()?;
        let removed = self
            .store
            .delete(id)
            .map_err(|e| storage_failure("delete", e))?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        info!("Deleted spot {}", id);
        Ok(removed)
    }

    pub fn by_genre(&self, genre: &str) -> CatalogResult<Vec<VideoRecord>> {
        Ok(query::filter(self.list()?, genre, QueryAttribute::Genre))
    }

    pub fn by_label(&self, label: &str) -> CatalogResult<Vec<VideoRecord>> {
        Ok(query::filter(self.list()?, label, QueryAttribute::Label))
    }

    /// Top `limit` records by views. Ties keep their natural order.
    pub fn most_viewed(&self, limit: usize) -> CatalogResult<Vec<VideoRecord>> {
        let mut records = self.list()?;
        records.sort_by(|a, b| b.views.cmp(&a.views));
        records.truncate(limit);
        Ok(records)
    }

    pub fn search(&self, query: &str, attribute: &str) -> CatalogResult<Vec<VideoRecord>> {
        let attribute = QueryAttribute::parse(attribute)?;
        let found = query::filter(self.list()?, query, attribute);
        debug!(
            "Search '{}' on {:?} matched {} spots",
            query,
            attribute,
            found.len()
        );
        Ok(found)
    }

    /// Loads `records` into an empty store. Does nothing when the store already
    /// has data; returns how many records were written.
    pub fn seed_if_empty(&self, records: Vec<VideoRecord>) -> CatalogResult<usize> {
        let _writer = self.lock_writer()?;
        let existing = self.store.count().map_err(|e| storage_failure("seed", e))?;
        if existing > 0 {
            info!("Store already holds {} spots, skipping seed", existing);
            return Ok(0);
        }

        for record in &records {
            validate_record(record)?;
        }
        for record in &records {
            self.store
                .put(record)
                .map_err(|e| storage_failure("seed", e))?;
        }
        info!("Seeded {} spots", records.len());
        Ok(records.len())
    }
}
