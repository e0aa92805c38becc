//! Multi-symbol time-series store.
//!
//! The store owns every bar and every derived column. Derived columns always
//! span the full history of every symbol; rows that have not been computed
//! hold NaN. A revision counter is bumped on every data-changing append and
//! each column records the revision it was written at, so callers can tell
//! whether a column reflects the current bars.

mod series;

pub use series::{Row, Series, BASE_COLUMNS, CLOSE, HIGH, LOW, OPEN, TIMESTAMP, VOLUME};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::StoreError;
use crate::types::{Bar, BarRecord};
use series::Upsert;

/// What an append changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppendSummary {
    /// Rows added at new timestamps
    pub inserted: usize,
    /// Rows replaced at existing timestamps
    pub updated: usize,
    /// Symbols seen for the first time, in arrival order
    pub new_symbols: Vec<String>,
}

impl AppendSummary {
    pub fn changed(&self) -> bool {
        self.inserted + self.updated > 0
    }
}

/// Freshly computed columns for every symbol, committed in one step by
/// [`SeriesStore::write_columns`].
#[derive(Debug, Clone, Default)]
pub struct ColumnBatch {
    names: Vec<String>,
    values: HashMap<String, Vec<Vec<f64>>>,
}

impl ColumnBatch {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            values: HashMap::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Stage one symbol's outputs, one vector per column in `names` order.
    pub fn insert(&mut self, symbol: impl Into<String>, columns: Vec<Vec<f64>>) {
        self.values.insert(symbol.into(), columns);
    }
}

#[derive(Debug, Default)]
pub struct SeriesStore {
    series: BTreeMap<String, Series>,
    /// Derived column name -> revision it was last written at
    columns: HashMap<String, u64>,
    revision: u64,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and upsert a batch of inbound bars.
    ///
    /// Every record is checked before anything is written; one malformed
    /// record rejects the whole batch and leaves the store untouched.
    pub fn append(&mut self, records: &[BarRecord]) -> Result<AppendSummary, StoreError> {
        let bars = records
            .iter()
            .enumerate()
            .map(|(record, rec)| {
                rec.validate()
                    .map_err(|reason| StoreError::MalformedInput { record, reason })
            })
            .collect::<Result<Vec<Bar>, _>>()?;

        let mut summary = AppendSummary::default();
        let columns = &self.columns;
        for bar in &bars {
            let series = self.series.entry(bar.symbol.clone()).or_insert_with(|| {
                summary.new_symbols.push(bar.symbol.clone());
                Series::new(&bar.symbol, columns.keys())
            });
            match series.upsert(bar) {
                Upsert::Inserted => summary.inserted += 1,
                Upsert::Updated => summary.updated += 1,
            }
        }

        if summary.changed() {
            self.revision += 1;
        }
        debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            new_symbols = summary.new_symbols.len(),
            revision = self.revision,
            "Appended bars"
        );
        Ok(summary)
    }

    /// Commit computed columns for every symbol at the current revision.
    ///
    /// The batch must cover every tracked symbol with full-length vectors;
    /// nothing is written unless the whole batch checks out.
    pub fn write_columns(&mut self, batch: ColumnBatch) -> Result<(), StoreError> {
        for symbol in batch.values.keys() {
            if !self.series.contains_key(symbol) {
                return Err(StoreError::UnknownSymbol(symbol.clone()));
            }
        }
        for (symbol, series) in &self.series {
            let columns = batch
                .values
                .get(symbol)
                .ok_or_else(|| StoreError::MissingSymbol(symbol.clone()))?;
            if columns.len() != batch.names.len() {
                return Err(StoreError::ColumnShape {
                    column: batch.names.join(","),
                    symbol: symbol.clone(),
                    expected: batch.names.len(),
                    actual: columns.len(),
                });
            }
            for (name, values) in batch.names.iter().zip(columns) {
                if values.len() != series.len() {
                    return Err(StoreError::ColumnShape {
                        column: name.clone(),
                        symbol: symbol.clone(),
                        expected: series.len(),
                        actual: values.len(),
                    });
                }
            }
        }

        let ColumnBatch { names, mut values } = batch;
        for (symbol, series) in self.series.iter_mut() {
            if let Some(columns) = values.remove(symbol) {
                for (name, column) in names.iter().zip(columns) {
                    series.set_column(name, column);
                }
            }
        }
        for name in names {
            self.columns.insert(name, self.revision);
        }
        Ok(())
    }

    /// Tracked symbols in lexicographic order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.series.keys().map(String::as_str)
    }

    pub fn series(&self, symbol: &str) -> Option<&Series> {
        self.series.get(symbol)
    }

    /// All series in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Series> + '_ {
        self.series.values()
    }

    /// Per symbol, the last `n` rows (oldest first).
    pub fn latest(&self, n: usize) -> BTreeMap<String, Vec<Row>> {
        self.series
            .iter()
            .map(|(symbol, series)| (symbol.clone(), series.tail(n)))
            .collect()
    }

    pub fn latest_row(&self, symbol: &str) -> Option<Row> {
        self.series.get(symbol).and_then(Series::last_row)
    }

    /// Whether `name` is a base column or a derived column that has been written.
    pub fn has_column(&self, name: &str) -> bool {
        BASE_COLUMNS.contains(&name) || self.columns.contains_key(name)
    }

    /// Whether `name` reflects the current bars. Base columns always do.
    pub fn is_current(&self, name: &str) -> bool {
        if BASE_COLUMNS.contains(&name) {
            return true;
        }
        self.columns.get(name) == Some(&self.revision)
    }

    /// Derived column names, sorted.
    pub fn derived_columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total bars across all symbols.
    pub fn bar_count(&self) -> usize {
        self.series.values().map(Series::len).sum()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
