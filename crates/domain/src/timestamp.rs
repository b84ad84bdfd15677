//! Creation-time values as they appear in stored documents.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A point in time as written by the document store or by a client.
///
/// Documents carry creation times in three shapes: a server-assigned
/// timestamp object, epoch milliseconds, or a date string (RFC 3339 or the
/// RFC 2822 form the identity provider uses for account metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Server timestamp assigned at write time.
    Server { seconds: i64, nanoseconds: u32 },
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// A date string.
    Text(String),
}

impl Timestamp {
    /// A server timestamp for the current instant.
    pub fn server_now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// A server timestamp for the given instant.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Timestamp::Server {
            seconds: at.timestamp(),
            nanoseconds: at.timestamp_subsec_nanos(),
        }
    }

    /// Epoch milliseconds for the current instant.
    pub fn millis_now() -> Self {
        Timestamp::Millis(Utc::now().timestamp_millis())
    }

    /// Resolves the value to a UTC instant.
    ///
    /// Returns `None` for strings that parse as neither RFC 3339 nor RFC 2822
    /// and for out-of-range numbers.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Server {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(*seconds, *nanoseconds).single(),
            Timestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_rfc2822(text))
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Short English month name ("Jan".."Dec") of the instant.
    pub fn month_label(&self) -> Option<String> {
        self.to_datetime().map(|dt| dt.format("%b").to_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_timestamp_deserializes_from_object() {
        let ts: Timestamp =
            serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 0}"#).unwrap();
        assert_eq!(
            ts,
            Timestamp::Server {
                seconds: 1_700_000_000,
                nanoseconds: 0
            }
        );
        assert_eq!(ts.month_label().as_deref(), Some("Nov"));
    }

    #[test]
    fn test_millis_and_text_resolve() {
        let ms: Timestamp = serde_json::from_str("1704067200000").unwrap();
        assert_eq!(ms.month_label().as_deref(), Some("Jan"));

        let iso: Timestamp = serde_json::from_str(r#""2024-03-15T10:00:00Z""#).unwrap();
        assert_eq!(iso.month_label().as_deref(), Some("Mar"));

        let rfc2822 = Timestamp::Text("Tue, 14 May 2024 08:30:00 GMT".to_string());
        assert_eq!(rfc2822.month_label().as_deref(), Some("May"));
    }

    #[test]
    fn test_unparsable_text_has_no_instant() {
        let ts = Timestamp::Text("yesterday-ish".to_string());
        assert!(ts.to_datetime().is_none());
        assert!(ts.month_label().is_none());
    }
}
