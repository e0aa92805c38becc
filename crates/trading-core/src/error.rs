//! Error types for the signal engine.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Time-series store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A bar record is missing a field or carries an out-of-range value.
    /// The whole batch it arrived in is rejected.
    #[error("Malformed bar at record {record}: {reason}")]
    MalformedInput { record: usize, reason: String },

    /// A column batch does not line up with the store's series.
    #[error("Column '{column}' for {symbol}: expected {expected} values, got {actual}")]
    ColumnShape {
        column: String,
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column batch is missing symbol {0}")]
    MissingSymbol(String),

    #[error("Column batch references unknown symbol {0}")]
    UnknownSymbol(String),
}

/// Indicator registration and computation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },

    #[error("Missing input column: {0}")]
    MissingColumn(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IndicatorError {
    pub fn invalid(indicator: impl Into<String>, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParameter {
            indicator: indicator.into(),
            reason: reason.into(),
        }
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{strategy} requires column '{column}', which has not been computed")]
    MissingColumn { strategy: String, column: String },

    #[error("{strategy} requires column '{column}', which is stale; replay indicators first")]
    StaleColumn { strategy: String, column: String },

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Bar feed errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
