use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::InvalidIsoDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Backend-assigned record identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub name: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub publish_date: NaiveDate,
    pub price: f64,
}

/// Parses a calendar date as sent by the backend.
///
/// Plain `YYYY-MM-DD` is the canonical form; full RFC 3339 timestamps (document
/// stores commonly serialize dates that way) are reduced to their calendar date.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, InvalidIsoDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|ts| ts.date_naive()))
        .map_err(|_| InvalidIsoDate(raw.to_string()))
}

pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_iso_date, ISO_DATE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(ISO_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_iso_date(&raw).map_err(de::Error::custom)
    }
}
