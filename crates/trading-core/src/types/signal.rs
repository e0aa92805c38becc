//! Buy/sell signals produced by strategy evaluation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::store::Row;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => f.pad("BUY"),
            Side::Sell => f.pad("SELL"),
        }
    }
}

/// A decision for one symbol together with the row that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub side: Side,
    pub row: Row,
}

impl Signal {
    pub fn symbol(&self) -> &str {
        &self.row.symbol
    }
}

/// Result of one evaluation pass: triggered rows keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Signals {
    pub buys: BTreeMap<String, Row>,
    pub sells: BTreeMap<String, Row>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal, keyed by the row's symbol.
    pub fn push(&mut self, side: Side, row: Row) {
        let book = match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        };
        book.insert(row.symbol.clone(), row);
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    /// Iterate all signals, buys first, each side in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        let buys = self.buys.values().map(|row| Signal {
            side: Side::Buy,
            row: row.clone(),
        });
        let sells = self.sells.values().map(|row| Signal {
            side: Side::Sell,
            row: row.clone(),
        });
        buys.chain(sells)
    }
}
