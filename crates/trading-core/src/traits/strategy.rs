//! Strategy trait definitions.

use tracing::{debug, trace};

use crate::error::StrategyError;
use crate::store::{Row, SeriesStore};
use crate::traits::IndicatorProvider;
use crate::types::{IndicatorSpec, PortfolioState, Side, Signals};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy trait.
///
/// A strategy names the indicators it reads and supplies a buy rule and a
/// sell rule over a single row. Evaluation itself (column checks, pending
/// suppression, position branching) is shared by every implementation.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }

    /// Bound parameters, for reporting.
    fn parameters(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Indicators this strategy reads, as (registration name, spec) pairs.
    fn required_indicators(&self) -> Vec<(String, IndicatorSpec)>;

    /// Rule applied to a flat symbol's latest row.
    fn should_buy(&self, row: &Row) -> bool;

    /// Rule applied to a held symbol's latest row.
    fn should_sell(&self, row: &Row) -> bool;

    /// Every derived column the rules read.
    fn required_columns(&self) -> Vec<String> {
        self.required_indicators()
            .iter()
            .flat_map(|(_, spec)| spec.output_columns())
            .collect()
    }

    /// Evaluate the latest row of every symbol against the portfolio.
    ///
    /// Read-only: fails if a required column has not been computed or was
    /// computed before the most recent append.
    fn evaluate(
        &self,
        store: &SeriesStore,
        portfolio: &PortfolioState,
    ) -> Result<Signals, StrategyError> {
        for column in self.required_columns() {
            if !store.has_column(&column) {
                return Err(StrategyError::MissingColumn {
                    strategy: self.name().to_string(),
                    column,
                });
            }
            if !store.is_current(&column) {
                return Err(StrategyError::StaleColumn {
                    strategy: self.name().to_string(),
                    column,
                });
            }
        }

        let mut signals = Signals::new();
        for symbol in store.symbols() {
            if portfolio.has_pending_order(symbol) {
                trace!(symbol, "Order pending, skipping");
                continue;
            }
            let Some(row) = store.latest_row(symbol) else {
                continue;
            };

            if portfolio.holding(symbol).is_zero() {
                if self.should_buy(&row) {
                    signals.push(Side::Buy, row);
                }
            } else if self.should_sell(&row) {
                signals.push(Side::Sell, row);
            }
        }

        debug!(
            strategy = self.name(),
            buys = signals.buys.len(),
            sells = signals.sells.len(),
            "Evaluated"
        );
        Ok(signals)
    }

    /// Like [`Strategy::evaluate`], but first brings any absent or stale
    /// required indicator up to date through `provider`.
    fn evaluate_with(
        &self,
        provider: &mut dyn IndicatorProvider,
        store: &mut SeriesStore,
        portfolio: &PortfolioState,
    ) -> Result<Signals, StrategyError> {
        for (name, spec) in self.required_indicators() {
            provider.ensure(store, &name, &spec)?;
        }
        self.evaluate(store, portfolio)
    }
}
