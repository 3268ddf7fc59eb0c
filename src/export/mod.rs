//! Rendering a result set as a downloadable JSON or CSV file, and reading
//! such a file back.

use crate::video_store::{VideoRecord, RELEASE_DATE_FORMAT};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;

pub const JSON_FILE_NAME: &str = "filtered_data.json";
pub const CSV_FILE_NAME: &str = "filtered_data.csv";

const CSV_HEADER: [&str; 11] = [
    "id",
    "title",
    "director",
    "label",
    "release_date",
    "duration_seconds",
    "genre",
    "views",
    "comments",
    "likes",
    "performers",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

pub struct ExportedFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export(records: &[VideoRecord], format: ExportFormat) -> Result<ExportedFile> {
    match format {
        ExportFormat::Json => Ok(ExportedFile {
            file_name: JSON_FILE_NAME,
            content_type: "application/json",
            bytes: serde_json::to_vec_pretty(records).context("Failed to render JSON export")?,
        }),
        ExportFormat::Csv => Ok(ExportedFile {
            file_name: CSV_FILE_NAME,
            content_type: "text/csv; charset=utf-8",
            bytes: render_csv(records)?.into_bytes(),
        }),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(records: &[VideoRecord]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", CSV_HEADER.join(","))?;
    for r in records {
        // performers cell is a JSON array
        let performers =
            serde_json::to_string(&r.performers).context("Failed to render performers")?;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&r.id),
            csv_field(&r.title),
            csv_field(&r.director),
            csv_field(&r.label),
            r.release_date_text(),
            r.duration_seconds,
            csv_field(&r.genre),
            r.views,
            r.comments,
            r.likes,
            csv_field(&performers),
        )?;
    }
    Ok(out)
}

pub fn parse_json(bytes: &[u8]) -> Result<Vec<VideoRecord>> {
    serde_json::from_slice(bytes).context("Failed to parse JSON export")
}

/// Splits CSV text into rows of fields, honoring quoted fields that contain
/// separators, doubled quotes or line breaks.
fn split_csv_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        bail!("Unterminated quoted field in CSV");
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

fn parse_number<T: std::str::FromStr>(value: &str, column: &str, line: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid {} '{}' on CSV row {}", column, value, line))
}

pub fn parse_csv(bytes: &[u8]) -> Result<Vec<VideoRecord>> {
    let text = std::str::from_utf8(bytes).context("CSV export is not valid UTF-8")?;
    let mut rows = split_csv_rows(text)?.into_iter();

    match rows.next() {
        Some(header) if header == CSV_HEADER => {}
        Some(header) => bail!("Unexpected CSV header: {}", header.join(",")),
        None => bail!("CSV export is empty"),
    }

    rows.enumerate()
        .map(|(index, row)| -> Result<VideoRecord> {
            let line = index + 2;
            let [id, title, director, label, release_date, duration_seconds, genre, views, comments, likes, performers]: [String; 11] =
                row.try_into().map_err(|row: Vec<String>| {
                    anyhow::anyhow!("CSV row {} has {} fields, expected 11", line, row.len())
                })?;
            Ok(VideoRecord {
                release_date: NaiveDate::parse_from_str(&release_date, RELEASE_DATE_FORMAT)
                    .with_context(|| format!("Invalid release_date on CSV row {}", line))?,
                duration_seconds: parse_number(&duration_seconds, "duration_seconds", line)?,
                views: parse_number(&views, "views", line)?,
                comments: parse_number(&comments, "comments", line)?,
                likes: parse_number(&likes, "likes", line)?,
                performers: serde_json::from_str(&performers)
                    .with_context(|| format!("Invalid performers on CSV row {}", line))?,
                id,
                title,
                director,
                label,
                genre,
            })
        })
        .collect()
}
