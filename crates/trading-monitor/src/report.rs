//! Per-cycle and end-of-run reports.

use std::collections::BTreeMap;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use trading_core::{AppendSummary, PortfolioState, Side, Signal, Signals};

/// One emitted signal, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalLine {
    pub side: Side,
    pub symbol: String,
    pub timestamp: i64,
    pub close: f64,
    /// Derived values on the triggering row; undefined values serialize as null.
    pub values: BTreeMap<String, f64>,
}

impl From<Signal> for SignalLine {
    fn from(signal: Signal) -> Self {
        Self {
            side: signal.side,
            symbol: signal.row.symbol,
            timestamp: signal.row.timestamp,
            close: signal.row.close,
            values: signal.row.values,
        }
    }
}

/// What happened in one append -> replay -> evaluate cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: usize,
    pub strategy: String,
    pub inserted: usize,
    pub updated: usize,
    pub new_symbols: Vec<String>,
    pub signals: Vec<SignalLine>,
    /// Nonzero holdings after any simulated fills
    pub positions: BTreeMap<String, Decimal>,
}

impl CycleReport {
    pub fn new(
        cycle: usize,
        strategy: &str,
        appended: &AppendSummary,
        signals: &Signals,
        portfolio: &PortfolioState,
    ) -> Self {
        Self {
            cycle,
            strategy: strategy.to_string(),
            inserted: appended.inserted,
            updated: appended.updated,
            new_symbols: appended.new_symbols.clone(),
            signals: signals.iter().map(SignalLine::from).collect(),
            positions: positions(portfolio),
        }
    }

    /// Human-readable block: a header line, then one line per signal.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "cycle {:>4} [{}] +{} bars ({} updated), {} signal(s)\n",
            self.cycle,
            self.strategy,
            self.inserted,
            self.updated,
            self.signals.len()
        );
        if !self.new_symbols.is_empty() {
            s.push_str(&format!("  new symbols: {}\n", self.new_symbols.join(", ")));
        }
        for line in &self.signals {
            s.push_str(&format!(
                "  {:<4} {:<12} {} close={:.4}{}\n",
                line.side,
                line.symbol,
                format_timestamp(line.timestamp),
                line.close,
                format_values(&line.values)
            ));
        }
        s
    }

    /// Single-line JSON, one object per cycle.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub cycles: usize,
    pub failed_cycles: usize,
    pub buys: usize,
    pub sells: usize,
    pub symbols: usize,
    pub bars: usize,
    pub positions: BTreeMap<String, Decimal>,
}

impl RunSummary {
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        for line in &report.signals {
            match line.side {
                Side::Buy => self.buys += 1,
                Side::Sell => self.sells += 1,
            }
        }
    }

    pub fn record_failure(&mut self) {
        self.cycles += 1;
        self.failed_cycles += 1;
    }

    /// Capture the final store size and holdings.
    pub fn finish(&mut self, symbols: usize, bars: usize, portfolio: &PortfolioState) {
        self.symbols = symbols;
        self.bars = bars;
        self.positions = positions(portfolio);
    }

    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("═══════════════════════════════════════════════\n");
        s.push_str("                  RUN SUMMARY                  \n");
        s.push_str("═══════════════════════════════════════════════\n");
        s.push_str(&format!("  Cycles:              {}\n", self.cycles));
        s.push_str(&format!("  Failed Cycles:       {}\n", self.failed_cycles));
        s.push_str(&format!("  Symbols:             {}\n", self.symbols));
        s.push_str(&format!("  Bars:                {}\n", self.bars));
        s.push_str(&format!("  Buy Signals:         {}\n", self.buys));
        s.push_str(&format!("  Sell Signals:        {}\n", self.sells));
        if !self.positions.is_empty() {
            s.push_str("───────────────────────────────────────────────\n");
            for (symbol, quantity) in &self.positions {
                s.push_str(&format!("  {:<20} {}\n", symbol, quantity));
            }
        }
        s.push_str("═══════════════════════════════════════════════\n");
        s
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn positions(portfolio: &PortfolioState) -> BTreeMap<String, Decimal> {
    portfolio
        .positions()
        .map(|(symbol, qty)| (symbol.to_string(), qty))
        .collect()
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_values(values: &BTreeMap<String, f64>) -> String {
    values
        .iter()
        .filter(|(_, v)| !v.is_nan())
        .map(|(k, v)| format!(" {k}={v:.4}"))
        .collect()
}
