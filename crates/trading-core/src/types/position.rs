//! Caller-held portfolio state consumed by strategy evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::Side;

/// Per-symbol position state as seen by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    /// No shares held
    Flat,
    /// Nonzero holding
    Held,
}

/// Holdings and pending-order flags for every tracked symbol.
///
/// Symbols missing from either map are treated as flat with no pending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    #[serde(default)]
    holdings: HashMap<String, Decimal>,
    #[serde(default)]
    pending_orders: HashSet<String>,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PortfolioState::set_holding`].
    pub fn with_holding(mut self, symbol: impl Into<String>, quantity: Decimal) -> Self {
        self.set_holding(symbol, quantity);
        self
    }

    /// Builder form of [`PortfolioState::set_pending`].
    pub fn with_pending(mut self, symbol: impl Into<String>) -> Self {
        self.set_pending(symbol, true);
        self
    }

    pub fn set_holding(&mut self, symbol: impl Into<String>, quantity: Decimal) {
        self.holdings.insert(symbol.into(), quantity);
    }

    pub fn set_pending(&mut self, symbol: impl Into<String>, pending: bool) {
        let symbol = symbol.into();
        if pending {
            self.pending_orders.insert(symbol);
        } else {
            self.pending_orders.remove(&symbol);
        }
    }

    /// Current holding quantity (zero when unknown).
    pub fn holding(&self, symbol: &str) -> Decimal {
        self.holdings.get(symbol).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn has_pending_order(&self, symbol: &str) -> bool {
        self.pending_orders.contains(symbol)
    }

    pub fn position_state(&self, symbol: &str) -> PositionState {
        if self.holding(symbol).is_zero() {
            PositionState::Flat
        } else {
            PositionState::Held
        }
    }

    /// Apply an executed order: buys add to the holding, sells reduce it
    /// (never below zero). Clears the symbol's pending flag.
    pub fn apply_fill(&mut self, symbol: &str, side: Side, quantity: Decimal) {
        let current = self.holding(symbol);
        let next = match side {
            Side::Buy => current + quantity,
            Side::Sell => (current - quantity).max(Decimal::ZERO),
        };
        self.holdings.insert(symbol.to_string(), next);
        self.pending_orders.remove(symbol);
    }

    /// Iterate nonzero holdings.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.holdings
            .iter()
            .filter(|(_, qty)| !qty.is_zero())
            .map(|(symbol, qty)| (symbol.as_str(), *qty))
    }
}
