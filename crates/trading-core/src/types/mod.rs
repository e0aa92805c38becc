//! Core data types for the signal engine.

mod indicator;
mod ohlcv;
mod position;
mod signal;

pub use indicator::{columns, IndicatorSpec};
pub use ohlcv::{Bar, BarRecord};
pub use position::{PortfolioState, PositionState};
pub use signal::{Side, Signal, Signals};
