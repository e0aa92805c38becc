//! CSV bar feed.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use trading_core::error::DataError;
use trading_core::traits::BarSource;
use trading_core::types::BarRecord;

/// CSV record format. Every cell is optional; the store rejects gaps.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        default,
        alias = "time_key",
        alias = "date",
        alias = "Date",
        alias = "Timestamp"
    )]
    timestamp: Option<String>,
    #[serde(default, alias = "code", alias = "Symbol", alias = "Code")]
    symbol: Option<String>,
    #[serde(default, alias = "Open")]
    open: Option<f64>,
    #[serde(default, alias = "High")]
    high: Option<f64>,
    #[serde(default, alias = "Low")]
    low: Option<f64>,
    #[serde(default, alias = "Close", alias = "Adj Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

/// Replays a CSV file as a bar feed: one warm-up batch covering the first
/// `warmup` distinct timestamps, then one batch per following timestamp.
pub struct CsvDataSource {
    path: PathBuf,
    batches: VecDeque<Vec<BarRecord>>,
}

impl CsvDataSource {
    /// Read and batch the whole file.
    pub fn open(path: impl AsRef<Path>, warmup: usize) -> Result<Self, DataError> {
        let path = path.as_ref().to_path_buf();
        let records = load_records(&path)?;
        let batches = batch_by_timestamp(records, warmup);

        info!(
            path = %path.display(),
            batches = batches.len(),
            warmup,
            "Loaded CSV feed"
        );
        Ok(Self { path, batches })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Batches not yet handed out.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl BarSource for CsvDataSource {
    fn next_batch(&mut self) -> Result<Option<Vec<BarRecord>>, DataError> {
        let batch = self.batches.pop_front();
        if let Some(batch) = &batch {
            debug!(records = batch.len(), remaining = self.batches.len(), "Next batch");
        }
        Ok(batch)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Read every row of a CSV file as an unvalidated bar record, in file order.
pub fn load_records(path: &Path) -> Result<Vec<BarRecord>, DataError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        let row: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let timestamp = match row.timestamp.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_timestamp(raw).map_err(|e| {
                DataError::ParseError(format!("row {}: {}", line + 1, e))
            })?),
            None => None,
        };

        records.push(BarRecord {
            symbol: row.symbol.filter(|s| !s.is_empty()),
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(records)
}

/// Group records by timestamp in ascending order. Records without a
/// timestamp stay with the record before them in the file (or the first
/// batch if they lead the file).
fn batch_by_timestamp(records: Vec<BarRecord>, warmup: usize) -> VecDeque<Vec<BarRecord>> {
    let mut groups: BTreeMap<i64, Vec<BarRecord>> = BTreeMap::new();
    let mut leading = Vec::new();
    let mut last = None;

    for record in records {
        match record.timestamp.or(last) {
            Some(ts) => {
                last = Some(ts);
                groups.entry(ts).or_default().push(record);
            }
            None => leading.push(record),
        }
    }

    let mut groups = groups.into_values();
    let mut batches = VecDeque::new();

    let mut first: Vec<BarRecord> = leading;
    for group in groups.by_ref().take(warmup) {
        first.extend(group);
    }
    if !first.is_empty() {
        batches.push_back(first);
    }
    batches.extend(groups);
    batches
}

/// Parse various timestamp formats into Unix milliseconds.
pub fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp: milliseconds if > 10 digits, otherwise seconds
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts.checked_mul(1000).ok_or_else(|| {
            DataError::ParseError(format!("Timestamp out of range: {}", date_str))
        });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
