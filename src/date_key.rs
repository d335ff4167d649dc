use crate::errors::{KeyListError, TrackerError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A civil day in its canonical `YYYY-MM-DD` form.
///
/// The fixed-width, zero-padded layout makes the derived string ordering
/// match chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    key: String,
    date: NaiveDate,
}

impl DateKey {
    pub fn parse(text: &str) -> Result<Self, TrackerError> {
        if !is_canonical_shape(text) {
            return Err(TrackerError::InvalidRecordFormat(text.to_string()));
        }
        NaiveDate::parse_from_str(text, KEY_FORMAT)
            .map(Self::from_date)
            .map_err(|_| TrackerError::InvalidRecordFormat(text.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            key: date.format(KEY_FORMAT).to_string(),
            date,
        }
    }

    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn previous(&self) -> Option<Self> {
        self.date().pred_opt().map(Self::from_date)
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

/// Reads a JSON array of keys, the shape shared by the record slot and
/// backups. One bad element fails the whole list.
pub fn parse_key_list(text: &str) -> Result<Vec<DateKey>, KeyListError> {
    let value: Value = serde_json::from_str(text).map_err(KeyListError::Json)?;
    let Value::Array(items) = value else {
        return Err(KeyListError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .and_then(|raw| DateKey::parse(raw).ok())
                .ok_or_else(|| KeyListError::BadEntry {
                    index,
                    value: item.to_string(),
                })
        })
        .collect()
}

// chrono accepts unpadded fields and signed years, the key format does not.
fn is_canonical_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
