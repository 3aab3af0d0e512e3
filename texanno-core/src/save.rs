//! Save records: named, timestamped snapshots grouping a set of annotations.
//!
//! A save is immutable except for its `final` and `deleted` flags. Later saves
//! sharing a savename supersede earlier ones rather than overwrite them; only
//! autosaves are replaced in place.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies one save of one user on one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaveKey {
    /// Document id.
    #[serde(rename = "fileid")]
    pub file_id: String,
    /// User id.
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Save name.
    pub savename: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl SaveKey {
    /// Create a save key.
    #[must_use]
    pub fn new(
        file_id: impl Into<String>,
        user_id: impl Into<String>,
        savename: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            user_id: user_id.into(),
            savename: savename.into(),
            timestamp,
        }
    }

    /// Prefix that makes annotation ids of this save unique across saves.
    #[must_use]
    pub fn id_prefix(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// A save and its mutable flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Save {
    /// Identity of the save.
    #[serde(flatten)]
    pub key: SaveKey,
    /// Marked as the user's final version.
    #[serde(rename = "final")]
    pub is_final: bool,
    /// Created by autosave (replaced in place by the next autosave).
    pub autosave: bool,
    /// Soft-deleted.
    pub deleted: bool,
    /// Window start taken from the `begin annotation` row, if any.
    pub start: Option<usize>,
    /// Window end taken from the `end annotation` row, if any.
    pub end: Option<usize>,
}

/// A save listed together with its annotation count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    /// The save.
    #[serde(flatten)]
    pub save: Save,
    /// Number of annotations in the save.
    pub count: usize,
}

/// Filter for listing saves. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveFilter {
    /// Restrict to one document.
    pub file_id: Option<String>,
    /// Restrict to one user.
    pub user_id: Option<String>,
    /// Restrict to saves whose final flag equals this value.
    pub is_final: Option<bool>,
}

impl SaveFilter {
    /// Match every non-deleted save.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only saves on `file_id`.
    #[must_use]
    pub fn file(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// Only saves by `user_id`.
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Only final saves.
    #[must_use]
    pub fn finals(mut self) -> Self {
        self.is_final = Some(true);
        self
    }

    /// Whether `save` passes the filter. Deleted saves never match.
    #[must_use]
    pub fn matches(&self, save: &Save) -> bool {
        !save.deleted
            && self.file_id.as_ref().map_or(true, |f| *f == save.key.file_id)
            && self.user_id.as_ref().map_or(true, |u| *u == save.key.user_id)
            && self.is_final.map_or(true, |f| f == save.is_final)
    }
}

/// Render a timestamp the way the store reports it (`%Y-%m-%d %H:%M:%S%.6f`).
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Parse a save timestamp as it arrives from query strings.
///
/// Accepts RFC 3339 and the database text forms, with or without fractional
/// seconds, with a `+00` suffix, or with the `+` mangled to a space (` 00`).
/// Naive forms are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = trimmed
        .strip_suffix("+00")
        .or_else(|| trimmed.strip_suffix(" 00"))
        .unwrap_or(trimmed)
        .trim_end();

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(dt.and_utc());
        }
    }

    Err(Error::parse(format!("unrecognized timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 7, 30, 22, 49, 49).unwrap();

        for raw in [
            "2024-07-30 22:49:49",
            "2024-07-30 22:49:49+00",
            "2024-07-30 22:49:49 00",
            "2024-07-30T22:49:49Z",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap(), expected, "{}", raw);
        }

        let fractional = parse_timestamp("2024-07-30 22:49:49.493816 00").unwrap();
        assert_eq!(fractional.nanosecond(), 493_816_000);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_format_roundtrip() {
        let ts = parse_timestamp("2024-07-30 22:49:49.493816").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-07-30 22:49:49.493816");
        assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
    }

    #[test]
    fn test_filter() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut save = Save {
            key: SaveKey::new("doc.tex", "ana", "draft", ts),
            is_final: false,
            autosave: false,
            deleted: false,
            start: None,
            end: None,
        };

        assert!(SaveFilter::all().matches(&save));
        assert!(SaveFilter::all().file("doc.tex").user("ana").matches(&save));
        assert!(!SaveFilter::all().user("ben").matches(&save));
        assert!(!SaveFilter::all().finals().matches(&save));

        save.is_final = true;
        assert!(SaveFilter::all().finals().matches(&save));

        save.deleted = true;
        assert!(!SaveFilter::all().matches(&save));
    }
}
