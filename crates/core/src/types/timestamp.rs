//! Canonical timestamp type.
//!
//! Documents written by different clients store dates either as the store's
//! native timestamp object (`{"seconds": .., "nanoseconds": ..}`) or as an
//! ISO 8601 string. Both forms deserialize into the same [`Timestamp`], so
//! comparisons downstream never see mixed representations. Serialization
//! always writes RFC 3339.

use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The Unix epoch. Used as the sort key for records without a date.
    #[must_use]
    pub const fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    /// Build from seconds and nanoseconds since the epoch.
    #[must_use]
    pub fn from_parts(seconds: i64, nanoseconds: u32) -> Option<Self> {
        DateTime::from_timestamp(seconds, nanoseconds).map(Self)
    }

    /// Parse an ISO 8601 string.
    ///
    /// Accepts RFC 3339, date-times without an offset and bare dates. Missing
    /// offsets are read as UTC, bare dates as midnight UTC.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(naive.and_utc()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }

    /// The wrapped UTC datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// RFC 3339 in UTC, keeping sub-second digits only when present,
    /// e.g. `2024-05-01T10:00:00Z`. Parsing the output yields the same value.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

/// Wire forms accepted for a timestamp.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(s) => Self::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
            RawTimestamp::Native {
                seconds,
                nanoseconds,
            } => Self::from_parts(seconds, nanoseconds).ok_or_else(|| {
                serde::de::Error::custom(format!("timestamp out of range: {seconds}s"))
            }),
        }
    }
}

/// Lenient decoder for optional date fields.
///
/// Unparsable values decode as `None` instead of failing the whole document,
/// matching how records without a usable date sort as the epoch.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce any value.
pub fn deserialize_lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
