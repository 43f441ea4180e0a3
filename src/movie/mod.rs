//! Fetch a title from the provider and normalize it into a `MovieRecord`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::provider::MetadataProvider;

/// Provider convention for "field not available".
pub const NOT_AVAILABLE: &str = "N/A";

pub const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

/// Scores below this are rotten.
pub const FRESH_THRESHOLD: u8 = 60;

pub const ROTTEN_RED: &str = "#fa320a";
pub const BARBIE_PINK: &str = "#e0218a";
pub const FRESH_GREEN: &str = "#46d369";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub poster_url: String,
    pub year: String,
    pub box_office_display: String,
    pub box_office_value: u64,
    pub rotten_tomatoes_display: String,
    pub rotten_tomatoes_value: u8,
    pub accent_color: String,
}

/// Outcome of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(MovieRecord),
    Absent,
}

/// A numeric field the provider returned in a shape we cannot parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error: Could not parse {field} '{value}' for movie '{title}'")]
pub struct NormalizeError {
    pub title: String,
    pub field: &'static str,
    pub value: String,
}

/// Subset of the OMDb payload we read. Every field is read leniently: a
/// wrong JSON type degrades to a default instead of failing the lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProviderMovie {
    #[serde(default, deserialize_with = "lenient_string")]
    response: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    box_office: Option<String>,
    #[serde(default, deserialize_with = "lenient_ratings")]
    ratings: Vec<ProviderRating>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProviderRating {
    #[serde(default, deserialize_with = "lenient_string")]
    source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    value: Option<String>,
}

/// Strings pass through, numbers and booleans keep their JSON text, anything
/// else is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Entries that are not rating objects are dropped; a non-list is empty.
fn lenient_ratings<'de, D>(deserializer: D) -> Result<Vec<ProviderRating>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

pub struct MovieFetcher<P: MetadataProvider> {
    provider: P,
}

impl<P: MetadataProvider> MovieFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Look up `title`. Transport failures and provider "not found" both
    /// come back as `Lookup::Absent`.
    pub fn lookup(&self, title: &str) -> Result<Lookup, NormalizeError> {
        let body = match self.provider.fetch(title) {
            Ok(body) => body,
            Err(e) => {
                warn!(title, error = %e, "provider lookup failed");
                return Ok(Lookup::Absent);
            }
        };

        if !body.is_object() {
            warn!(title, "provider payload is not a JSON object");
            return Ok(Lookup::Absent);
        }

        let movie: ProviderMovie = match serde_json::from_value(body) {
            Ok(movie) => movie,
            Err(e) => {
                warn!(title, error = %e, "unexpected provider payload");
                return Ok(Lookup::Absent);
            }
        };

        if movie.response.as_deref() == Some("False") {
            debug!(
                title,
                reason = movie.error.as_deref().unwrap_or("unknown"),
                "provider has no record"
            );
            return Ok(Lookup::Absent);
        }

        normalize(title, movie).map(Lookup::Found)
    }
}

fn normalize(title: &str, movie: ProviderMovie) -> Result<MovieRecord, NormalizeError> {
    let malformed = |field: &'static str, value: &str| NormalizeError {
        title: title.to_string(),
        field,
        value: value.to_string(),
    };

    let box_office_display = movie
        .box_office
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let box_office_value = if box_office_display == NOT_AVAILABLE {
        0
    } else {
        parse_box_office(&box_office_display)
            .ok_or_else(|| malformed("box office", &box_office_display))?
    };

    let rotten_tomatoes_display = find_rating(&movie.ratings, ROTTEN_TOMATOES)
        .unwrap_or(NOT_AVAILABLE)
        .to_string();
    let rotten_tomatoes_value = if rotten_tomatoes_display == NOT_AVAILABLE {
        0
    } else {
        parse_percent(&rotten_tomatoes_display)
            .ok_or_else(|| malformed("Rotten Tomatoes score", &rotten_tomatoes_display))?
    };

    Ok(MovieRecord {
        title: movie.title.unwrap_or_default(),
        poster_url: movie.poster.unwrap_or_default(),
        year: movie.year.unwrap_or_default(),
        box_office_display,
        box_office_value,
        rotten_tomatoes_display,
        rotten_tomatoes_value,
        accent_color: accent_color(rotten_tomatoes_value, title).to_string(),
    })
}

/// Value of the first rating whose source is exactly `source`. A first
/// match without a value yields `None`; later duplicates are not consulted.
fn find_rating<'a>(ratings: &'a [ProviderRating], source: &str) -> Option<&'a str> {
    ratings
        .iter()
        .find(|r| r.source.as_deref() == Some(source))
        .and_then(|r| r.value.as_deref())
}

/// `"$1,000,000"` -> `1000000`.
pub fn parse_box_office(display: &str) -> Option<u64> {
    let digits: String = display
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    digits.parse().ok()
}

/// `"93%"` -> `93`. Values above 100 are rejected.
pub fn parse_percent(display: &str) -> Option<u8> {
    let trimmed = display.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
    number.parse::<u8>().ok().filter(|v| *v <= 100)
}

pub fn accent_color(rotten_tomatoes_value: u8, title: &str) -> &'static str {
    if rotten_tomatoes_value < FRESH_THRESHOLD {
        ROTTEN_RED
    } else if title.contains("Barbie") {
        BARBIE_PINK
    } else {
        FRESH_GREEN
    }
}
