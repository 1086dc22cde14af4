//! Time and timestamp helpers.
//!
//! Calendar dates and times-of-day are interpreted in UTC throughout.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

/// UTC timestamp used for `created_at`, `updated_at`, and "now" comparisons.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Calendar date of a timestamp.
#[must_use]
pub fn date_of(ts: Timestamp) -> NaiveDate {
    ts.date_naive()
}

/// Time-of-day of a timestamp, truncated to the minute.
#[must_use]
pub fn minute_of(ts: Timestamp) -> NaiveTime {
    let time = ts.time();
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Serde helpers for times-of-day written as `HH:MM` (seconds accepted on input).
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Parse `HH:MM` or `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error when neither format matches.
    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, "%H:%M").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }

    /// Render as `HH:MM`.
    #[must_use]
    pub fn format(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Same encoding for `Option<NaiveTime>`.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, de};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&super::format(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
