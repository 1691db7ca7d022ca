//! A UTC point in time as it is stored in the database and sent over the wire.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-31T09:30:00.000Z`.
///
/// Every timestamp has the same width, so comparing the text in SQLite gives
/// the same ordering as comparing the points in time.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A point in time, normalised to UTC and truncated to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// The current time.
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    /// Parse a timestamp from an RFC 3339 date-time or a `YYYY-MM-DD` date.
    ///
    /// A plain date is interpreted as midnight UTC at the start of that day.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if `text` is in neither format.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::parse_with(text, |date| date.midnight())
    }

    /// Parse a timestamp that closes an inclusive date range.
    ///
    /// Same as [Timestamp::parse], except that a plain date is interpreted as
    /// the last millisecond of that day so that the whole day is included.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if `text` is in neither format.
    pub fn parse_end_of_range(text: &str) -> Result<Self, Error> {
        Self::parse_with(text, |date| {
            date.with_hms_milli(23, 59, 59, 999)
                .unwrap_or_else(|_| date.midnight())
        })
    }

    fn parse_with(
        text: &str,
        date_to_time: impl FnOnce(Date) -> PrimitiveDateTime,
    ) -> Result<Self, Error> {
        let text = text.trim();

        if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
            return Ok(Self::from(date_time));
        }

        Date::parse(text, DATE_FORMAT)
            .map(|date| Self::from(date_to_time(date).assume_utc()))
            .map_err(|_| Error::InvalidDate(text.to_owned()))
    }

    /// The underlying date-time in UTC.
    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        let utc = value.to_offset(UtcOffset::UTC);

        Self(utc.replace_millisecond(utc.millisecond()).unwrap_or(utc))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.0.format(TIMESTAMP_FORMAT).map_err(|_| std::fmt::Error)?;

        f.write_str(&text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
            .map(|date_time| Self(date_time.assume_utc()))
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
