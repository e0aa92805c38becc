//! Feed replay command: append -> replay -> evaluate per batch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use trading_config::AppConfig;
use trading_core::error::TradingError;
use trading_core::traits::{BarSource, Strategy};
use trading_core::{AppendSummary, BarRecord, PortfolioState, SeriesStore, Signals};
use trading_data::CsvDataSource;
use trading_indicators::IndicatorEngine;
use trading_monitor::{CycleReport, RunSummary};
use trading_strategies::StrategyRegistry;

use crate::cli::{OutputFormat, RunArgs};

pub fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let strategy = StrategyRegistry::new()
        .create(&config.strategy.name, config.strategy.params_value())
        .with_context(|| format!("Failed to create strategy '{}'", config.strategy.name))?;

    let path = args
        .data
        .or_else(|| config.feed.path.as_ref().map(PathBuf::from))
        .context("No bar feed: pass --data or set feed.path")?;
    let warmup = args.warmup.unwrap_or(config.feed.warmup_bars);
    let mut source = CsvDataSource::open(&path, warmup)
        .with_context(|| format!("Failed to open bar feed {}", path.display()))?;

    let mut store = SeriesStore::new();
    let mut engine = IndicatorEngine::new();
    for (name, spec) in config.indicator_registrations() {
        engine
            .register_and_run(&mut store, &name, spec)
            .with_context(|| format!("Failed to register indicator '{name}'"))?;
    }

    let mut portfolio = config.portfolio.to_state();
    let mut summary = RunSummary::default();

    info!(
        strategy = strategy.name(),
        source = source.name(),
        feed = %path.display(),
        warmup,
        indicators = engine.len(),
        simulate_fills = args.simulate_fills,
        "Starting run"
    );

    let mut cycle = 0;
    while let Some(batch) = source.next_batch()? {
        cycle += 1;
        let (appended, signals) =
            match run_cycle(&mut store, &mut engine, strategy.as_ref(), &portfolio, &batch) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(cycle, bars = batch.len(), error = %e, "Cycle failed, skipping batch");
                    summary.record_failure();
                    continue;
                }
            };

        if args.simulate_fills {
            for signal in signals.iter() {
                portfolio.apply_fill(signal.symbol(), signal.side, config.portfolio.lot_size);
                info!(
                    symbol = signal.symbol(),
                    side = %signal.side,
                    quantity = %config.portfolio.lot_size,
                    "Simulated fill"
                );
            }
        }

        let report = CycleReport::new(cycle, strategy.name(), &appended, &signals, &portfolio);
        summary.record(&report);
        match args.output {
            OutputFormat::Json => println!("{}", report.to_json()?),
            OutputFormat::Text if !report.signals.is_empty() => print!("{}", report.summary()),
            OutputFormat::Text => {}
        }
    }

    summary.finish(store.len(), store.bar_count(), &portfolio);
    info!(
        cycles = summary.cycles,
        failed = summary.failed_cycles,
        buys = summary.buys,
        sells = summary.sells,
        "Run complete"
    );
    match args.output {
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Text => print!("{}", summary.summary()),
    }

    Ok(())
}

/// One full cycle. A rejected batch leaves the store as it was; a failed
/// replay leaves columns stale until the next successful one.
fn run_cycle(
    store: &mut SeriesStore,
    engine: &mut IndicatorEngine,
    strategy: &dyn Strategy,
    portfolio: &PortfolioState,
    batch: &[BarRecord],
) -> Result<(AppendSummary, Signals), TradingError> {
    let appended = store.append(batch)?;
    engine.replay(store)?;
    let signals = strategy.evaluate_with(engine, store, portfolio)?;
    Ok((appended, signals))
}
