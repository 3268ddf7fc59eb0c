//! VideoStore trait definition.
//!
//! Both storage backends (SQLite and the JSON document file) implement this
//! so the catalog gateway never knows which one it is talking to.

use super::models::VideoRecord;
use anyhow::Result;

pub trait VideoStore: Send + Sync {
    /// All records in the backend's natural order.
    fn list_all(&self) -> Result<Vec<VideoRecord>>;

    fn get(&self, id: &str) -> Result<Option<VideoRecord>>;

    /// Inserts the record, or replaces the one with the same id in place.
    fn put(&self, record: &VideoRecord) -> Result<()>;

    /// Removes a record, returning it if it existed.
    fn delete(&self, id: &str) -> Result<Option<VideoRecord>>;

    fn count(&self) -> Result<usize>;

    /// Short name used in logs and the home stats.
    fn backend_name(&self) -> &'static str;
}
