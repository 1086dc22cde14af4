//! Column encodings shared by the repositories.
//!
//! Ids, labels, dates and decimals are stored as text and parsed back with
//! their `FromStr` impls; timestamps use RFC 3339.

use std::error::Error;
use std::str::FromStr;

use chrono::NaiveTime;
use fieldhub_domain::time::Timestamp;

pub(crate) fn decode_error(err: impl Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn parse<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    value.parse().map_err(decode_error)
}

pub(crate) fn parse_opt<T>(value: Option<String>) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    value.as_deref().map(parse).transpose()
}

pub(crate) fn timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(decode_error)
}

pub(crate) fn time_text(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub(crate) fn narrow<T: TryFrom<i64>>(value: i64) -> Result<T, sqlx::Error>
where
    T::Error: Error + Send + Sync + 'static,
{
    T::try_from(value).map_err(decode_error)
}

pub(crate) fn narrow_opt<T: TryFrom<i64>>(value: Option<i64>) -> Result<Option<T>, sqlx::Error>
where
    T::Error: Error + Send + Sync + 'static,
{
    value.map(narrow).transpose()
}
