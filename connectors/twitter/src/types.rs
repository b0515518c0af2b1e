//! Twitter API v1.1 status types.
//!
//! Only the fields the processors use are modelled; everything else in the
//! payload is ignored. Fields the API omits or nulls deserialize to `None`.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// A status (tweet) as returned by the v1.1 timeline endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// Numeric status ID
    #[serde(default)]
    pub id: u64,

    /// Status ID as a string (safe for JavaScript consumers)
    #[serde(default)]
    pub id_str: Option<String>,

    /// Creation time, e.g. "Wed Oct 11 10:30:00 +0000 2023"
    #[serde(default)]
    pub created_at: String,

    /// Untruncated text (present with `tweet_mode=extended`)
    #[serde(default)]
    pub full_text: Option<String>,

    /// Legacy, possibly truncated text
    #[serde(default)]
    pub text: Option<String>,

    /// Exact location, when the author shared it
    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    /// Place the status is associated with
    #[serde(default)]
    pub place: Option<Place>,

    /// Posting client as an HTML anchor
    #[serde(default)]
    pub source: Option<String>,

    /// Machine-detected language (BCP47)
    #[serde(default)]
    pub lang: Option<String>,

    /// Author
    #[serde(default)]
    pub user: Option<TwitterUser>,
}

impl Status {
    /// Status ID, preferring the string form the API guarantees to be exact.
    #[must_use]
    pub fn status_id(&self) -> u64 {
        self.id_str
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(self.id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geo Types
// ─────────────────────────────────────────────────────────────────────────────

/// GeoJSON point attached to a status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Geometry type, always "Point" for statuses
    #[serde(rename = "type", default = "default_point")]
    pub geo_type: String,

    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

fn default_point() -> String {
    "Point".into()
}

impl Coordinates {
    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude(), self.longitude())
    }
}

/// Place object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Place ID
    #[serde(default)]
    pub id: Option<String>,

    /// Full name (e.g., "San Francisco, CA")
    #[serde(default)]
    pub full_name: Option<String>,

    /// Place name
    #[serde(default)]
    pub name: Option<String>,

    /// Country
    #[serde(default)]
    pub country: Option<String>,

    /// Country code
    #[serde(default)]
    pub country_code: Option<String>,

    /// Place type ("city", "admin", ...)
    #[serde(default)]
    pub place_type: Option<String>,
}

impl Place {
    /// Best human-readable label for the place.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        if let Some(full_name) = &self.full_name {
            return Some(full_name.clone());
        }
        match (&self.name, &self.country) {
            (Some(name), Some(country)) => Some(format!("{name}, {country}")),
            (Some(name), None) => Some(name.clone()),
            (None, Some(country)) => Some(country.clone()),
            (None, None) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Types
// ─────────────────────────────────────────────────────────────────────────────

/// Twitter user object (subset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterUser {
    /// User ID as a string
    #[serde(default)]
    pub id_str: String,

    /// Handle without @
    #[serde(default)]
    pub screen_name: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Free-text profile location
    #[serde(default)]
    pub location: Option<String>,
}
