use std::path::PathBuf;

use chrono::NaiveDateTime;
use csv::StringRecord;
use serde::Deserialize;

use super::normalize::{self, LogSchema};

// ---------------------------------------------------------------------------
// RawDataset – the file as loaded, before any coercion
// ---------------------------------------------------------------------------

/// Untyped rows of a delimited log, in file order.
#[derive(Debug, Clone)]
pub struct RawDataset {
    /// Where the rows came from (used in error and log messages).
    pub path: PathBuf,
    /// Header row, trimmed.
    pub headers: StringRecord,
    /// Data rows, trimmed. Lengths may differ from the header.
    pub rows: Vec<StringRecord>,
}

impl RawDataset {
    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// Typed log records
// ---------------------------------------------------------------------------

/// One call recorded by the fibonacci host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DurationRecord {
    #[serde(rename = "JOB_NUMBER")]
    pub job_number: i64,
    /// Benchmark phase tag; see [`super::select::MEASURED_TERM`].
    #[serde(rename = "TERM")]
    pub term: i64,
    /// Call duration in microseconds.
    #[serde(rename = "DURATION", deserialize_with = "normalize::finite_f64")]
    pub duration_us: f64,
}

impl LogSchema for DurationRecord {
    const COLUMNS: &'static [&'static str] = &["JOB_NUMBER", "TERM", "DURATION"];
}

/// One memory/CPU utilisation sample of the host process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "DATETIME", deserialize_with = "normalize::datetime")]
    pub datetime: NaiveDateTime,
    /// Memory usage, percent.
    #[serde(rename = "MEM", deserialize_with = "normalize::finite_f64")]
    pub mem: f64,
    /// CPU usage, percent.
    #[serde(rename = "CPU", deserialize_with = "normalize::finite_f64")]
    pub cpu: f64,
}

impl LogSchema for ResourceRecord {
    const COLUMNS: &'static [&'static str] = &["DATETIME", "MEM", "CPU"];
}

// ---------------------------------------------------------------------------
// Series – the numeric columns handed to statistics and plotting
// ---------------------------------------------------------------------------

/// Measured-phase call durations ordered by job number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationSeries {
    pub job_numbers: Vec<i64>,
    /// Durations in milliseconds, parallel to `job_numbers`.
    pub durations_ms: Vec<f64>,
}

impl DurationSeries {
    pub fn len(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations_ms.is_empty()
    }
}

/// Memory and CPU samples in chronological order. All three vectors are parallel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub mem: Vec<f64>,
    pub cpu: Vec<f64>,
}

impl ResourceSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
