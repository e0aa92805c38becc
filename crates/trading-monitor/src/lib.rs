//! Logging setup and cycle reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{CycleReport, RunSummary, SignalLine};
