//! Persistent storage for music video records.

mod json_store;
mod models;
mod schema;
mod sqlite_store;
mod trait_def;
mod validation;

pub use json_store::JsonFileVideoStore;
pub use models::{NewVideoRecord, VideoRecord, VideoRecordPatch, RELEASE_DATE_FORMAT};
pub use sqlite_store::SqliteVideoStore;
pub use trait_def::VideoStore;
pub use validation::{complete_new_record, validate_record, ValidationError, ValidationResult};

#[cfg(test)]
pub(crate) use models::test_records;
