//! Flattened tweet records handed to processors.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shill_twitter::{Coordinates, Place, Status};

use crate::error::{ConfigError, ConfigResult};

/// Timestamp layout used by the v1.1 API, e.g. "Wed Oct 11 10:30:00 +0000 2023".
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// One post, reduced to what the processors look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetRecord {
    /// Status ID, 0 when unknown
    #[serde(default)]
    pub id: u64,

    /// Posting date as reported by the API
    pub date: String,

    /// Untruncated text
    pub text: String,

    /// Exact location, if shared
    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    /// Tagged place, if any
    #[serde(default)]
    pub place: Option<Place>,

    /// Posting client as an HTML anchor
    #[serde(default)]
    pub source: Option<String>,

    /// Raw creation time
    pub created_at: String,

    /// `created_at` parsed, when it is well formed
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TweetRecord {
    /// Build a record from an API status.
    ///
    /// Text comes from `full_text`, then `text`, then the empty string.
    #[must_use]
    pub fn from_status(status: &Status) -> Self {
        let text = status
            .full_text
            .clone()
            .or_else(|| status.text.clone())
            .unwrap_or_default();

        Self {
            id: status.status_id(),
            date: status.created_at.clone(),
            text,
            coordinates: status.coordinates.clone(),
            place: status.place.clone(),
            source: status.source.clone(),
            created_at: status.created_at.clone(),
            timestamp: parse_created_at(&status.created_at),
        }
    }

    /// Record with just a date and text.
    #[must_use]
    pub fn new(date: impl Into<String>, text: impl Into<String>) -> Self {
        let date = date.into();
        Self {
            timestamp: parse_created_at(&date),
            created_at: date.clone(),
            date,
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Flatten API statuses into records, preserving order.
#[must_use]
pub fn extract_tweets(statuses: &[Status]) -> Vec<TweetRecord> {
    statuses.iter().map(TweetRecord::from_status).collect()
}

/// Parse the API's `created_at` layout.
#[must_use]
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Read a saved timeline (a JSON array of statuses).
pub fn load_statuses(path: impl AsRef<Path>) -> ConfigResult<Vec<Status>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;

    fn uk_statuses() -> Vec<Status> {
        serde_json::from_value(serde_json::json!([
            {
                "id": 1712345678901234567_u64,
                "id_str": "1712345678901234567",
                "created_at": "Wed Oct 11 10:30:00 +0000 2023",
                "full_text": "The colour of autumn leaves is absolutely brilliant this year. Centre of town looks lovely.",
                "text": "The colour of autumn leaves is absolutely brilliant this year.",
                "coordinates": null,
                "place": {"country": "United Kingdom", "name": "London"},
                "source": "<a href=\"http://twitter.com/download/iphone\" rel=\"nofollow\">Twitter for iPhone</a>"
            },
            {
                "id": 1712345678901234568_u64,
                "created_at": "Thu Oct 12 14:15:00 +0000 2023",
                "text": "Favour doing this properly rather than rushing through it.",
                "coordinates": {"type": "Point", "coordinates": [-2.2426, 53.4808]},
                "place": {"country": "United Kingdom", "name": "Manchester"},
                "source": "<a href=\"http://twitter.com/download/android\" rel=\"nofollow\">Twitter for Android</a>"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_extract_prefers_full_text() {
        let records = extract_tweets(&uk_statuses());

        assert_eq!(records.len(), 2);
        assert!(records[0].text.ends_with("Centre of town looks lovely."));
        assert_eq!(records[0].date, "Wed Oct 11 10:30:00 +0000 2023");
        assert_eq!(records[0].date, records[0].created_at);
        assert_eq!(
            records[0].place.as_ref().and_then(|p| p.name.as_deref()),
            Some("London")
        );
    }

    #[test]
    fn test_extract_falls_back_to_text() {
        let records = extract_tweets(&uk_statuses());
        assert_eq!(
            records[1].text,
            "Favour doing this properly rather than rushing through it."
        );
        assert!(records[1].coordinates.is_some());
        assert_eq!(records[1].id, 1_712_345_678_901_234_568);
    }

    #[test]
    fn test_extract_without_any_text() {
        let status = Status {
            created_at: "Wed Oct 11 10:30:00 +0000 2023".into(),
            ..Default::default()
        };
        let records = extract_tweets(&[status]);
        assert_eq!(records[0].text, "");
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract_tweets(&[]).is_empty());
    }

    #[test]
    fn test_timestamp_parsing() {
        let ts = parse_created_at("Thu Oct 12 14:15:00 +0000 2023").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 10, 12));
        assert_eq!(ts.hour(), 14);
        assert!(parse_created_at("yesterday").is_none());
    }

    #[test]
    fn test_load_saved_timeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&uk_statuses()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let statuses = load_statuses(file.path()).unwrap();
        assert_eq!(statuses.len(), 2);
    }

    #[test]
    fn test_load_saved_timeline_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(
            load_statuses(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
