//! Indicator registration and replay over a [`SeriesStore`].

use serde::Serialize;
use tracing::{debug, info, warn};

use trading_core::error::IndicatorError;
use trading_core::store::{ColumnBatch, SeriesStore};
use trading_core::traits::IndicatorProvider;
use trading_core::IndicatorSpec;

use crate::compute::compute;

/// A named indicator computation, re-run on every replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub spec: IndicatorSpec,
}

/// Ordered set of registered indicators.
///
/// The engine never holds the store; every call borrows it for its own
/// duration. Each computation runs over the full history of every symbol
/// and is committed all at once, so a failed call leaves the store as it
/// was.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    registrations: Vec<Registration>,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, compute for every symbol, commit, then record the
    /// registration. A registration with the same name is replaced in place.
    pub fn register_and_run(
        &mut self,
        store: &mut SeriesStore,
        name: &str,
        spec: IndicatorSpec,
    ) -> Result<(), IndicatorError> {
        Self::run(store, &spec)?;

        let conflicts = self.conflicts(name, &spec);
        if !conflicts.is_empty() {
            warn!(
                indicator = name,
                overwrites = ?conflicts,
                "Output columns shared with a differently configured indicator; last in replay order wins"
            );
        }

        let registration = Registration {
            name: name.to_string(),
            spec,
        };
        match self.registrations.iter_mut().find(|r| r.name == name) {
            Some(existing) => *existing = registration,
            None => self.registrations.push(registration),
        }
        info!(indicator = name, total = self.registrations.len(), "Registered indicator");
        Ok(())
    }

    /// Re-run every registration in order over the current history.
    pub fn replay(&self, store: &mut SeriesStore) -> Result<(), IndicatorError> {
        for registration in &self.registrations {
            Self::run(store, &registration.spec)?;
            debug!(indicator = %registration.name, spec = %registration.spec, "Replayed");
        }
        Ok(())
    }

    /// Compute `spec` under `name` unless an equal spec is registered and
    /// all its columns are current. Returns whether it computed.
    pub fn ensure(
        &mut self,
        store: &mut SeriesStore,
        name: &str,
        spec: &IndicatorSpec,
    ) -> Result<bool, IndicatorError> {
        let registered = self.get(name) == Some(spec);
        if registered && spec.output_columns().iter().all(|c| store.is_current(c)) {
            return Ok(false);
        }
        debug!(indicator = name, "Computing on demand");
        self.register_and_run(store, name, spec.clone())?;
        Ok(true)
    }

    /// Names of other registrations that write at least one of `spec`'s
    /// output columns with different parameters.
    pub fn conflicts(&self, name: &str, spec: &IndicatorSpec) -> Vec<&str> {
        let outputs = spec.output_columns();
        self.registrations
            .iter()
            .filter(|r| r.name != name && r.spec != *spec)
            .filter(|r| r.spec.output_columns().iter().any(|c| outputs.contains(c)))
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorSpec> {
        self.registrations
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.spec)
    }

    /// Drop a registration. Its columns stay in the store but are no longer
    /// replayed.
    pub fn unregister(&mut self, name: &str) -> Option<IndicatorSpec> {
        let index = self.registrations.iter().position(|r| r.name == name)?;
        Some(self.registrations.remove(index).spec)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn run(store: &mut SeriesStore, spec: &IndicatorSpec) -> Result<(), IndicatorError> {
        spec.validate()?;
        for input in spec.input_columns() {
            if !store.has_column(&input) {
                return Err(IndicatorError::MissingColumn(input));
            }
        }

        let mut batch = ColumnBatch::new(spec.output_columns());
        for series in store.iter() {
            batch.insert(series.symbol(), compute(spec, series)?);
        }
        store.write_columns(batch)?;
        Ok(())
    }
}

impl IndicatorProvider for IndicatorEngine {
    fn ensure(
        &mut self,
        store: &mut SeriesStore,
        name: &str,
        spec: &IndicatorSpec,
    ) -> Result<bool, IndicatorError> {
        IndicatorEngine::ensure(self, store, name, spec)
    }
}
