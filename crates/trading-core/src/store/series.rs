//! One symbol's ordered history: base OHLCV vectors plus derived columns.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::types::Bar;

pub const TIMESTAMP: &str = "timestamp";
pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";

/// Names that always resolve on any series.
pub const BASE_COLUMNS: [&str; 6] = [TIMESTAMP, OPEN, HIGH, LOW, CLOSE, VOLUME];

/// Outcome of inserting one bar into a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upsert {
    Inserted,
    Updated,
}

/// Column-oriented bar history for one symbol, sorted by timestamp.
#[derive(Debug, Clone, Default)]
pub struct Series {
    symbol: String,
    timestamps: Vec<i64>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
    derived: HashMap<String, Vec<f64>>,
}

impl Series {
    pub(crate) fn new<'a>(symbol: &str, derived: impl Iterator<Item = &'a String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            derived: derived.map(|name| (name.clone(), Vec::new())).collect(),
            ..Default::default()
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Look up a price/volume or derived column by name.
    ///
    /// `timestamp` is not a float column and resolves to `None` here.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            OPEN => Some(&self.open),
            HIGH => Some(&self.high),
            LOW => Some(&self.low),
            CLOSE => Some(&self.close),
            VOLUME => Some(&self.volume),
            _ => self.derived.get(name).map(Vec::as_slice),
        }
    }

    /// Snapshot of row `index`.
    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.len() {
            return None;
        }
        Some(Row {
            symbol: self.symbol.clone(),
            timestamp: self.timestamps[index],
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
            values: self
                .derived
                .iter()
                .map(|(name, values)| (name.clone(), values[index]))
                .collect(),
        })
    }

    pub fn last_row(&self) -> Option<Row> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// The last `n` rows, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Row> {
        let start = self.len().saturating_sub(n);
        (start..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Insert at the sorted position, or replace the row with the same
    /// timestamp. Either way the row's derived values become NaN.
    pub(crate) fn upsert(&mut self, bar: &Bar) -> Upsert {
        let idx = self.timestamps.partition_point(|&t| t < bar.timestamp);

        if idx < self.len() && self.timestamps[idx] == bar.timestamp {
            self.open[idx] = bar.open;
            self.high[idx] = bar.high;
            self.low[idx] = bar.low;
            self.close[idx] = bar.close;
            self.volume[idx] = bar.volume;
            for values in self.derived.values_mut() {
                values[idx] = f64::NAN;
            }
            return Upsert::Updated;
        }

        self.timestamps.insert(idx, bar.timestamp);
        self.open.insert(idx, bar.open);
        self.high.insert(idx, bar.high);
        self.low.insert(idx, bar.low);
        self.close.insert(idx, bar.close);
        self.volume.insert(idx, bar.volume);
        for values in self.derived.values_mut() {
            values.insert(idx, f64::NAN);
        }
        Upsert::Inserted
    }

    pub(crate) fn set_column(&mut self, name: &str, values: Vec<f64>) {
        self.derived.insert(name.to_string(), values);
    }
}

/// Snapshot of one series row with every derived value.
///
/// Undefined values are NaN and serialize to `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub symbol: String,
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub values: BTreeMap<String, f64>,
}

impl Row {
    /// Value of a base or derived column. Timestamp is not included.
    pub fn get(&self, column: &str) -> Option<f64> {
        match column {
            OPEN => Some(self.open),
            HIGH => Some(self.high),
            LOW => Some(self.low),
            CLOSE => Some(self.close),
            VOLUME => Some(self.volume),
            _ => self.values.get(column).copied(),
        }
    }

    /// Like [`Row::get`], but NaN and missing both come back as `None`.
    pub fn defined(&self, column: &str) -> Option<f64> {
        self.get(column).filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new("X", ts, close, close, close, close, 100.0)
    }

    #[test]
    fn test_upsert_keeps_order() {
        let names = vec!["sma_2".to_string()];
        let mut series = Series::new("X", names.iter());

        assert_eq!(series.upsert(&bar(30, 3.0)), Upsert::Inserted);
        assert_eq!(series.upsert(&bar(10, 1.0)), Upsert::Inserted);
        assert_eq!(series.upsert(&bar(20, 2.0)), Upsert::Inserted);

        assert_eq!(series.timestamps(), &[10, 20, 30]);
        assert_eq!(series.close(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.column("sma_2").map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_upsert_replaces_and_clears_derived() {
        let mut series = Series::new("X", std::iter::empty());
        series.upsert(&bar(10, 1.0));
        series.upsert(&bar(20, 2.0));
        series.set_column("d", vec![5.0, 6.0]);

        assert_eq!(series.upsert(&bar(20, 9.0)), Upsert::Updated);
        assert_eq!(series.len(), 2);
        assert_eq!(series.close(), &[1.0, 9.0]);

        let derived = series.column("d").unwrap();
        assert_eq!(derived[0], 5.0);
        assert!(derived[1].is_nan());
    }

    #[test]
    fn test_rows() {
        let mut series = Series::new("X", std::iter::empty());
        assert!(series.last_row().is_none());

        for (i, c) in [1.0, 2.0, 3.0].iter().enumerate() {
            series.upsert(&bar(i as i64, *c));
        }
        series.set_column("d", vec![f64::NAN, 0.5, 1.5]);

        let last = series.last_row().unwrap();
        assert_eq!(last.close, 3.0);
        assert_eq!(last.get("d"), Some(1.5));
        assert_eq!(last.get("close"), Some(3.0));
        assert_eq!(last.get("nope"), None);

        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].timestamp, 1);
        assert_eq!(tail[0].defined("d"), Some(0.5));
        assert_eq!(series.tail(10).len(), 3);
        assert_eq!(series.row(0).unwrap().defined("d"), None);
    }

    #[test]
    fn test_row_serializes_nan_as_null() {
        let mut series = Series::new("X", std::iter::empty());
        series.upsert(&bar(1, 1.0));
        series.set_column("d", vec![f64::NAN]);

        let json = serde_json::to_value(series.last_row().unwrap()).unwrap();
        assert!(json["values"]["d"].is_null());
        assert_eq!(json["close"], 1.0);
    }
}
