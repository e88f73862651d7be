use chrono::NaiveDateTime;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

use super::error::LoadError;
use super::model::RawDataset;

/// Timestamp layout of the resource log.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Schema: which columns a record type needs
// ---------------------------------------------------------------------------

/// A typed row that can be coerced from a [`RawDataset`] row.
pub trait LogSchema: DeserializeOwned {
    /// Header names that must be present for any row to parse.
    const COLUMNS: &'static [&'static str];
}

/// Rows that survived coercion, plus how many did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Coerce every raw row into `T`, keeping file order.
///
/// A row is kept only if every field `T` needs parses; anything else is
/// dropped whole. Dropping is not an error. Only a header that lacks one of
/// `T::COLUMNS` fails, since then no row could ever parse.
pub fn normalize<T: LogSchema>(raw: &RawDataset) -> Result<Normalized<T>, LoadError> {
    for &column in T::COLUMNS {
        if raw.column_index(column).is_none() {
            return Err(LoadError::MissingColumn {
                path: raw.path.clone(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::with_capacity(raw.len());
    let mut dropped = 0;
    for row in &raw.rows {
        match row.deserialize::<T>(Some(&raw.headers)) {
            Ok(record) => records.push(record),
            Err(_) => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!(
            "{}: dropped {dropped} of {} rows that failed coercion",
            raw.path.display(),
            raw.len()
        );
    }

    Ok(Normalized { records, dropped })
}

// ---------------------------------------------------------------------------
// Field coercions (used through `#[serde(deserialize_with)]`)
// ---------------------------------------------------------------------------

/// A decimal number that is neither NaN nor infinite.
pub fn finite_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(D::Error::custom(format!("non-finite number {value}")))
    }
}

/// A `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT).map_err(D::Error::custom)
}
