//! Case-insensitive substring filtering over music video records.

mod attribute;
mod filter;

pub use attribute::{QueryAttribute, UnknownAttribute};
pub use filter::{filter, matches};
