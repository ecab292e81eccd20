//! Calendar dates at the ingestion boundary.
//!
//! Records and filters carry plain calendar dates. Stored values may be bare
//! `YYYY-MM-DD` strings or full RFC 3339 timestamps; both are reduced to a
//! [`NaiveDate`] here so that comparisons never see an invalid date.

use chrono::{DateTime, NaiveDate};

use crate::error::{DomainError, DomainResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date, failing fast on anything unparsable.
pub fn parse_calendar_date(input: &str) -> DomainResult<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DomainError::validation("date cannot be empty"));
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| DomainError::validation(format!("invalid date: {s:?}")))
}

/// Serde adapter for `NaiveDate` fields: writes `YYYY-MM-DD`, reads anything
/// [`parse_calendar_date`] accepts.
///
/// Use with `#[serde(with = "warehouse_core::calendar_date")]`.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(super::DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}
