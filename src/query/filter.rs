use super::attribute::QueryAttribute;
use crate::video_store::VideoRecord;

/// Keeps the records whose `attribute` contains `query`, ignoring case.
///
/// An empty query keeps everything. Whitespace is not trimmed and counts as
/// part of the substring. Input order is preserved.
pub fn filter(records: Vec<VideoRecord>, query: &str, attribute: QueryAttribute) -> Vec<VideoRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| matches(record, &needle, attribute))
        .collect()
}

/// `needle` must already be lowercased.
pub fn matches(record: &VideoRecord, needle: &str, attribute: QueryAttribute) -> bool {
    attribute
        .values(record)
        .iter()
        .any(|value| value.to_lowercase().contains(needle))
}
