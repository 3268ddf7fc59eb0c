//! Validation for music video records.
//!
//! Create requests are checked for completeness first so a client gets
//! every missing field in one response; value checks run afterwards on the
//! fully assembled record.

use super::models::{NewVideoRecord, VideoRecord};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("Field '{field}' is required but was empty")]
    EmptyField { field: &'static str },
    #[error("At least one performer is required")]
    NoPerformers,
    #[error("Performer at position {position} is blank")]
    BlankPerformer { position: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks value constraints on a complete record.
pub fn validate_record(record: &VideoRecord) -> ValidationResult<()> {
    if record.id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "id" });
    }

    if record.performers.is_empty() {
        return Err(ValidationError::NoPerformers);
    }
    if let Some(position) = record.performers.iter().position(|p| p.trim().is_empty()) {
        return Err(ValidationError::BlankPerformer { position });
    }
    Ok(())
}

/// Turns a create request into a full record, reporting all absent fields at once.
///
/// The id must already have been assigned by the caller.
pub fn complete_new_record(id: String, new: NewVideoRecord) -> ValidationResult<VideoRecord> {
    let mut missing = Vec::new();
    if new.title.is_none() {
        missing.push("title");
    }
    if new.director.is_none() {
        missing.push("director");
    }
    if new.label.is_none() {
        missing.push("label");
    }
    if new.release_date.is_none() {
        missing.push("release_date");
    }
    if new.duration_seconds.is_none() {
        missing.push("duration_seconds");
    }
    if new.genre.is_none() {
        missing.push("genre");
    }
    if new.views.is_none() {
        missing.push("views");
    }
    if new.comments.is_none() {
        missing.push("comments");
    }
    if new.likes.is_none() {
        missing.push("likes");
    }
    if new.performers.is_none() {
        missing.push("performers");
    }

    match new {
        NewVideoRecord {
            title: Some(title),
            director: Some(director),
            label: Some(label),
            release_date: Some(release_date),
            duration_seconds: Some(duration_seconds),
            genre: Some(genre),
            views: Some(views),
            comments: Some(comments),
            likes: Some(likes),
            performers: Some(performers),
            ..
        } => {
            let record = VideoRecord {
                id,
                title,
                director,
                label,
                release_date,
                duration_seconds,
                genre,
                views,
                comments,
                likes,
                performers,
            };
            validate_record(&record)?;
            Ok(record)
        }
        _ => Err(ValidationError::MissingFields { fields: missing }),
    }
}
