//! Core traits for the signal engine.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::BarSource;
pub use indicator::{Indicator, IndicatorProvider, MultiOutputIndicator, OhlcvIndicator};
pub use strategy::{Strategy, StrategyConfig};
