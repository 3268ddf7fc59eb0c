//! Music video record models.
//!
//! `VideoRecord` is the canonical stored shape. `NewVideoRecord` and
//! `VideoRecordPatch` are the loosely-typed request shapes: every field is
//! optional so that missing fields can be reported explicitly instead of
//! failing deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Textual date form used everywhere a release date leaves the process.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One music video ("spot") with its performers attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub director: String,
    pub label: String,
    pub release_date: NaiveDate,
    pub duration_seconds: u32,
    pub genre: String,
    pub views: u64,
    pub comments: u64,
    pub likes: u64,
    pub performers: Vec<String>,
}

impl VideoRecord {
    pub fn release_date_text(&self) -> String {
        self.release_date.format(RELEASE_DATE_FORMAT).to_string()
    }
}

/// Body of a create request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewVideoRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub label: Option<String>,
    #[serde(alias = "date")]
    pub release_date: Option<NaiveDate>,
    #[serde(alias = "duration-seconds")]
    pub duration_seconds: Option<u32>,
    pub genre: Option<String>,
    pub views: Option<u64>,
    pub comments: Option<u64>,
    pub likes: Option<u64>,
    pub performers: Option<Vec<String>>,
}

/// Body of an update request. Only the supplied fields are applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VideoRecordPatch {
    pub title: Option<String>,
    pub director: Option<String>,
    pub label: Option<String>,
    #[serde(alias = "date")]
    pub release_date: Option<NaiveDate>,
    #[serde(alias = "duration-seconds")]
    pub duration_seconds: Option<u32>,
    pub genre: Option<String>,
    pub views: Option<u64>,
    pub comments: Option<u64>,
    pub likes: Option<u64>,
    pub performers: Option<Vec<String>>,
}

impl VideoRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.director.is_none()
            && self.label.is_none()
            && self.release_date.is_none()
            && self.duration_seconds.is_none()
            && self.genre.is_none()
            && self.views.is_none()
            && self.comments.is_none()
            && self.likes.is_none()
            && self.performers.is_none()
    }

    /// Shallow merge: every `Some` field replaces the record's value.
    pub fn apply_to(self, record: &mut VideoRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(director) = self.director {
            record.director = director;
        }
        if let Some(label) = self.label {
            record.label = label;
        }
        if let Some(release_date) = self.release_date {
            record.release_date = release_date;
        }
        if let Some(duration_seconds) = self.duration_seconds {
            record.duration_seconds = duration_seconds;
        }
        if let Some(genre) = self.genre {
            record.genre = genre;
        }
        if let Some(views) = self.views {
            record.views = views;
        }
        if let Some(comments) = self.comments {
            record.comments = comments;
        }
        if let Some(likes) = self.likes {
            record.likes = likes;
        }
        if let Some(performers) = self.performers {
            record.performers = performers;
        }
    }
}
