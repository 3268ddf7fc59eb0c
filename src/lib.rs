//! Music video catalog server library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod export;
pub mod oidc;
pub mod query;
pub mod server;
pub mod sqlite_persistence;
pub mod video_store;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogError};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use video_store::{JsonFileVideoStore, SqliteVideoStore, VideoRecord, VideoStore};
