//! Append -> replay -> evaluate cycles across the store, engine and strategies.

use approx::assert_relative_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use trading_core::error::StrategyError;
use trading_core::store::ColumnBatch;
use trading_core::traits::Strategy;
use trading_core::{Bar, BarRecord, PortfolioState, PositionState, SeriesStore, Side};
use trading_indicators::IndicatorEngine;
use trading_strategies::{
    BollingerBandsConfig, BollingerBandsStrategy, MACrossoverConfig, MACrossoverStrategy,
    MacdCrossoverConfig, MacdCrossoverStrategy, RsiConfig, RsiStrategy, StrategyRegistry,
};

fn records(symbol: &str, closes: &[f64], start: i64) -> Vec<BarRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(symbol, (start + i as i64) * 60_000, c, c, c, c, 500.0).into())
        .collect()
}

fn store_with(series: &[(&str, &[f64])]) -> SeriesStore {
    let mut store = SeriesStore::new();
    for (symbol, closes) in series {
        store.append(&records(symbol, closes, 0)).unwrap();
    }
    store
}

fn ma_strategy() -> MACrossoverStrategy {
    MACrossoverStrategy::new(MACrossoverConfig {
        short_period: 2,
        long_period: 3,
        use_ema: false,
    })
    .unwrap()
}

#[test]
fn rsi_on_short_history_is_undefined_and_silent() {
    let mut store = store_with(&[("X", &[10.0, 9.0, 8.0, 7.0, 20.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = RsiStrategy::new(RsiConfig::default()).unwrap();

    let signals = strategy
        .evaluate_with(&mut engine, &mut store, &PortfolioState::new())
        .unwrap();

    let rsi = store.series("X").unwrap().column("rsi_14").unwrap();
    assert!(rsi.iter().all(|v| v.is_nan()));
    assert!(signals.is_empty());
}

#[test]
fn bollinger_period_two_does_not_fire() {
    let mut store = store_with(&[("X", &[10.0, 12.0, 8.0, 14.0, 9.0, 11.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = BollingerBandsStrategy::new(BollingerBandsConfig { period: 2 }).unwrap();

    let signals = strategy
        .evaluate_with(&mut engine, &mut store, &PortfolioState::new())
        .unwrap();
    assert!(signals.is_empty());

    let series = store.series("X").unwrap();
    let middle = series.column("middle_band").unwrap();
    assert!(middle[0].is_nan());
    assert_eq!(&middle[1..], &[11.0, 10.0, 11.0, 11.5, 10.0]);

    let row = store.latest_row("X").unwrap();
    assert_relative_eq!(row.get("lower_band").unwrap(), 10.0 - 2.0 * 2f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(row.get("lower_band").unwrap(), 7.1716, epsilon = 1e-4);
}

#[test]
fn bollinger_buys_a_break_below_the_lower_band() {
    let mut store = store_with(&[("X", &[10.0, 10.0, 10.0, 10.0, 10.0, 4.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = BollingerBandsStrategy::new(BollingerBandsConfig { period: 6 }).unwrap();

    let signals = strategy
        .evaluate_with(&mut engine, &mut store, &PortfolioState::new())
        .unwrap();

    // mean 9, sample std sqrt(6): lower band ~4.101
    assert!(signals.buys.contains_key("X"));
    let row = &signals.buys["X"];
    assert_relative_eq!(row.get("lower_band").unwrap(), 9.0 - 2.0 * 6f64.sqrt(), epsilon = 1e-12);
}

fn write_macd(store: &mut SeriesStore, macd: Vec<f64>, signal: Vec<f64>) {
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    let mut batch = ColumnBatch::new(vec!["macd".into(), "signal".into(), "histogram".into()]);
    batch.insert("X", vec![macd, signal, histogram]);
    store.write_columns(batch).unwrap();
}

#[test]
fn macd_crossover_fires_only_on_the_latest_row() {
    let strategy = MacdCrossoverStrategy::new(MacdCrossoverConfig::default()).unwrap();
    let flat = PortfolioState::new();

    let mut store = store_with(&[("X", &[100.0])]);
    write_macd(&mut store, vec![5.0], vec![4.0]);
    let signals = strategy.evaluate(&store, &flat).unwrap();
    assert!(signals.buys.contains_key("X"));

    store.append(&records("X", &[101.0], 1)).unwrap();
    write_macd(&mut store, vec![5.0, 3.0], vec![4.0, 4.0]);
    assert!(strategy.evaluate(&store, &flat).unwrap().is_empty());

    let mut store = store_with(&[("X", &[100.0])]);
    write_macd(&mut store, vec![4.0], vec![4.0]);
    assert!(strategy.evaluate(&store, &flat).unwrap().is_empty());
    let held = PortfolioState::new().with_holding("X", dec!(10));
    assert!(strategy.evaluate(&store, &held).unwrap().is_empty());
}

#[test]
fn pending_order_suppresses_both_sides() {
    let mut store = store_with(&[("UP", &[1.0, 2.0, 3.0, 4.0]), ("DOWN", &[4.0, 3.0, 2.0, 1.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = ma_strategy();

    let portfolio = PortfolioState::new()
        .with_holding("DOWN", dec!(100))
        .with_pending("UP")
        .with_pending("DOWN");
    let signals = strategy.evaluate_with(&mut engine, &mut store, &portfolio).unwrap();
    assert!(signals.is_empty());

    let portfolio = PortfolioState::new().with_holding("DOWN", dec!(100));
    let signals = strategy.evaluate(&store, &portfolio).unwrap();
    assert_eq!(signals.buys.keys().collect::<Vec<_>>(), vec!["UP"]);
    assert_eq!(signals.sells.keys().collect::<Vec<_>>(), vec!["DOWN"]);
}

#[test]
fn evaluate_requires_a_replay_after_append() {
    let mut store = store_with(&[("UP", &[1.0, 2.0, 3.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = ma_strategy();

    assert!(matches!(
        strategy.evaluate(&store, &PortfolioState::new()),
        Err(StrategyError::MissingColumn { .. })
    ));

    for (name, spec) in strategy.required_indicators() {
        engine.register_and_run(&mut store, &name, spec).unwrap();
    }
    store.append(&records("UP", &[4.0], 3)).unwrap();
    assert!(matches!(
        strategy.evaluate(&store, &PortfolioState::new()),
        Err(StrategyError::StaleColumn { .. })
    ));

    engine.replay(&mut store).unwrap();
    let signals = strategy.evaluate(&store, &PortfolioState::new()).unwrap();
    assert!(signals.buys.contains_key("UP"));
}

/// 34 bars of oscillating closes followed by `tail`.
fn wave_then(tail: &[f64]) -> Vec<f64> {
    (0..34)
        .map(|i| 50.0 + 5.0 * (i as f64 * 0.7).sin())
        .chain(tail.iter().copied())
        .collect()
}

/// Every derived column of every symbol, NaN mapped to `None`.
fn snapshot(store: &SeriesStore) -> Vec<(String, String, Vec<Option<f64>>)> {
    let mut out = Vec::new();
    for series in store.iter() {
        for name in store.derived_columns() {
            let values = series
                .column(name)
                .unwrap()
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect();
            out.push((series.symbol().to_string(), name.to_string(), values));
        }
    }
    out
}

#[test]
fn lazy_compute_matches_up_front_compute() {
    // A drops off a flat stretch, B (held) and C climb at an accelerating pace
    let a = wave_then(&[50.0, 50.0, 50.0, 50.0, 50.0, 40.0]);
    let b = wave_then(&[45.0, 46.0, 48.0, 51.0, 55.0, 60.0]);
    let c = wave_then(&[45.0, 46.0, 48.0, 51.0, 55.0, 60.0]);
    let data: &[(&str, &[f64])] = &[("A", &a), ("B", &b), ("C", &c)];

    let registry = StrategyRegistry::new();
    let portfolio = PortfolioState::new().with_holding("B", dec!(5));
    let params = [
        ("bollinger_bands", json!({ "period": 6 })),
        ("ma_crossover", json!({ "short_period": 2, "long_period": 4 })),
        ("macd_crossover", json!({ "fast": 2, "slow": 4, "signal": 2 })),
        ("rsi", json!({ "period": 3 })),
    ];

    for (name, config) in params {
        let strategy = registry.create(name, config).unwrap();

        let mut lazy_store = store_with(data);
        let mut lazy_engine = IndicatorEngine::new();
        let lazy = strategy
            .evaluate_with(&mut lazy_engine, &mut lazy_store, &portfolio)
            .unwrap();

        let mut eager_store = store_with(data);
        let mut eager_engine = IndicatorEngine::new();
        for (indicator, spec) in strategy.required_indicators() {
            eager_engine
                .register_and_run(&mut eager_store, &indicator, spec)
                .unwrap();
        }
        eager_engine.replay(&mut eager_store).unwrap();
        let eager = strategy.evaluate(&eager_store, &portfolio).unwrap();

        assert!(!lazy.is_empty(), "{name} fired nothing");
        assert_eq!(lazy.buys.keys().collect::<Vec<_>>(), eager.buys.keys().collect::<Vec<_>>());
        assert_eq!(lazy.sells.keys().collect::<Vec<_>>(), eager.sells.keys().collect::<Vec<_>>());

        let lazy_values = snapshot(&lazy_store);
        assert!(
            lazy_values.iter().any(|(_, _, v)| v.iter().any(Option::is_some)),
            "{name} computed no defined values"
        );
        assert_eq!(lazy_values, snapshot(&eager_store), "{name}");
    }
}

#[test]
fn full_cycle_flat_held_flat() {
    let mut store = store_with(&[("X", &[1.0, 2.0, 3.0])]);
    let mut engine = IndicatorEngine::new();
    let strategy = ma_strategy();
    for (name, spec) in strategy.required_indicators() {
        engine.register_and_run(&mut store, &name, spec).unwrap();
    }
    let mut portfolio = PortfolioState::new();

    // rising: short 2.5 > long 2 -> buy
    let signals = strategy.evaluate(&store, &portfolio).unwrap();
    for signal in signals.iter() {
        assert_eq!(signal.side, Side::Buy);
        portfolio.apply_fill(signal.symbol(), signal.side, dec!(100));
    }
    assert_eq!(portfolio.position_state("X"), PositionState::Held);

    // falling: short 1.5 < long 2 -> sell
    store.append(&records("X", &[2.0, 1.0], 3)).unwrap();
    engine.replay(&mut store).unwrap();
    let signals = strategy.evaluate(&store, &portfolio).unwrap();
    assert_eq!(signals.sells.len(), 1);
    assert!(signals.buys.is_empty());
    portfolio.apply_fill("X", Side::Sell, dec!(100));
    assert_eq!(portfolio.position_state("X"), PositionState::Flat);
}
