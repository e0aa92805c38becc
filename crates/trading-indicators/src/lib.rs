//! Technical indicators and the engine that keeps them current.
//!
//! Every indicator produces a full-length column aligned with its input,
//! NaN where undefined:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (change in price, RSI, MACD, Stochastic)
//! - Volatility indicators (Standard Deviation, Bollinger Bands)
//!
//! [`IndicatorEngine`] holds the ordered registrations and replays them over
//! a [`trading_core::SeriesStore`] after each append.

pub mod compute;
pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod rolling;
pub mod volatility;

pub use compute::compute;
pub use engine::{IndicatorEngine, Registration};
pub use momentum::{ChangeInPrice, Macd, MacdOutput, Rsi, Stochastic, StochasticOutput};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
