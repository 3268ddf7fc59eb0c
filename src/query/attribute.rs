use crate::video_store::VideoRecord;
use std::str::FromStr;

/// The field(s) a listing query is matched against.
///
/// Parsed from a closed allow-list; both the English field names and the
/// Croatian column names used by the listing page are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryAttribute {
    /// title, director, label, genre or any single performer
    #[default]
    All,
    Performer,
    Title,
    Director,
    Label,
    Genre,
    ReleaseDate,
    DurationSeconds,
    Views,
    Comments,
    Likes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown query attribute '{0}'")]
pub struct UnknownAttribute(pub String);

impl QueryAttribute {
    pub fn parse(raw: &str) -> Result<QueryAttribute, UnknownAttribute> {
        let trimmed = raw.trim();
        let attribute = match trimmed.to_lowercase().as_str() {
            "" | "all" => QueryAttribute::All,
            "izvodac" | "performer" | "performers" => QueryAttribute::Performer,
            "title" | "naslov" => QueryAttribute::Title,
            "director" | "redatelj" => QueryAttribute::Director,
            "label" => QueryAttribute::Label,
            "genre" | "zanr" => QueryAttribute::Genre,
            "release_date" | "date" | "datum" => QueryAttribute::ReleaseDate,
            "duration_seconds" | "trajanje_sekunde" => QueryAttribute::DurationSeconds,
            "views" | "pregledi" => QueryAttribute::Views,
            "comments" | "komentari" => QueryAttribute::Comments,
            "likes" | "lajkovi" => QueryAttribute::Likes,
            _ => return Err(UnknownAttribute(trimmed.to_string())),
        };
        Ok(attribute)
    }

    /// Textual values of `record` this attribute matches against.
    pub(super) fn values(self, record: &VideoRecord) -> Vec<String> {
        match self {
            QueryAttribute::All => {
                let mut values = vec![
                    record.title.clone(),
                    record.director.clone(),
                    record.label.clone(),
                    record.genre.clone(),
                ];
                values.extend(record.performers.iter().cloned());
                values
            }
            QueryAttribute::Performer => record.performers.clone(),
            QueryAttribute::Title => vec![record.title.clone()],
            QueryAttribute::Director => vec![record.director.clone()],
            QueryAttribute::Label => vec![record.label.clone()],
            QueryAttribute::Genre => vec![record.genre.clone()],
            QueryAttribute::ReleaseDate => vec![record.release_date_text()],
            QueryAttribute::DurationSeconds => vec![record.duration_seconds.to_string()],
            QueryAttribute::Views => vec![record.views.to_string()],
            QueryAttribute::Comments => vec![record.comments.to_string()],
            QueryAttribute::Likes => vec![record.likes.to_string()],
        }
    }
}

impl FromStr for QueryAttribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryAttribute::parse(s)
    }
}
