//! Bar feeds for the signal engine.

mod csv_source;

pub use csv_source::{load_records, parse_timestamp, CsvDataSource};
