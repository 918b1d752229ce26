use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Post entity - a single blog entry.
///
/// `id` and `date` are assigned once at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    /// Remote URL, `/uploads/...` path or data URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

impl Post {
    /// Create a post from submitted fields, stamping `id` and `date` from `now`.
    ///
    /// `date` keeps millisecond precision so it survives a round trip
    /// through the stored JSON unchanged.
    pub fn new(fields: NewPost, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id: now.timestamp_millis(),
            title: fields.title,
            author: fields.author,
            tags: fields.tags,
            content: fields.content,
            image: fields.image,
            date: now,
        }
    }
}

/// Fields submitted for a new post, not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub tags: Vec<String>,
    pub content: String,
    pub image: Option<String>,
}

impl NewPost {
    /// Title, author and content must all be present.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing = [&self.title, &self.author, &self.content]
            .iter()
            .any(|field| field.trim().is_empty());

        if missing {
            return Err(DomainError::Validation(
                "title, author and content are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated tag string, trimming pieces and dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Written as RFC 3339 in UTC with millisecond precision, e.g.
/// `2025-03-01T10:15:30.123Z`.
///
/// Hand-edited files may also carry a date-time without an offset or a bare
/// date; both are read as UTC.
mod iso_millis {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(raw.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {:?}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }
}
