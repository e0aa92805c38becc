//! Core types and traits for the signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Bar records and their validation
//! - The multi-symbol time-series store
//! - Indicator specifications, signals and portfolio state
//! - Core traits for strategies, indicators and bar feeds

pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::TradingError;
pub use store::{AppendSummary, ColumnBatch, Row, Series, SeriesStore};
pub use traits::*;
pub use types::*;
