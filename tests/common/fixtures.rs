//! Fixture spots loaded into every test server.

use super::constants::*;
use chrono::NaiveDate;
use serde_json::json;
use video_catalog_server::VideoRecord;

#[allow(clippy::too_many_arguments)]
fn spot(
    id: &str,
    title: &str,
    director: &str,
    label: &str,
    (year, month, day): (i32, u32, u32),
    duration_seconds: u32,
    genre: &str,
    (views, comments, likes): (u64, u64, u64),
    performers: &[&str],
) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        title: title.to_string(),
        director: director.to_string(),
        label: label.to_string(),
        release_date: NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date"),
        duration_seconds,
        genre: genre.to_string(),
        views,
        comments,
        likes,
        performers: performers.iter().map(|p| p.to_string()).collect(),
    }
}

/// Five spots across three labels and three genres.
///
/// Views order: spot-2 > spot-1 > spot-5 > spot-4 > spot-3.
pub fn test_spots() -> Vec<VideoRecord> {
    vec![
        spot(
            SPOT_1_ID,
            SPOT_1_TITLE,
            "Curtis Hanson",
            SHARED_LABEL,
            (2002, 10, 28),
            326,
            "Hip-Hop",
            (1_500_000, 1200, 90_000),
            &[SHARED_PERFORMER],
        ),
        spot(
            SPOT_2_ID,
            "Bad Romance",
            "Francis Lawrence",
            SHARED_LABEL,
            (2009, 11, 10),
            308,
            "Pop",
            (2_000_000, 3000, 150_000),
            &["Lady Gaga"],
        ),
        spot(
            SPOT_3_ID,
            "Sabotage",
            "Spike Jonze",
            "Capitol",
            (1994, 2, 21),
            178,
            "Hip-Hop",
            (300_000, 450, 20_000),
            &["Beastie Boys"],
        ),
        spot(
            SPOT_4_ID,
            "Closer",
            "Mark Romanek",
            "Nothing",
            (1994, 6, 1),
            373,
            "Industrial",
            (800_000, 900, 40_000),
            &["Nine Inch Nails"],
        ),
        spot(
            SPOT_5_ID,
            "Stan",
            "Philip Atwell",
            SHARED_LABEL,
            (2000, 11, 21),
            404,
            "Hip-Hop",
            (1_200_000, 1500, 70_000),
            &[SHARED_PERFORMER, "Dido"],
        ),
    ]
}

/// A complete create request body without an id.
pub fn new_spot_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "director": "Hype Williams",
        "label": "Bad Boy",
        "release_date": "1997-08-12",
        "duration_seconds": 265,
        "genre": "Hip-Hop",
        "views": 42,
        "comments": 3,
        "likes": 7,
        "performers": ["Notorious B.I.G.", "Puff Daddy"]
    })
}
