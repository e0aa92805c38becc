//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};

/// A validated OHLCV bar for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument identity
    pub symbol: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// An inbound bar as delivered by a feed, before validation.
///
/// Every field is optional so that a feed can hand over whatever it parsed;
/// [`BarRecord::validate`] decides whether the record becomes a [`Bar`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl BarRecord {
    /// Check required fields and value ranges.
    ///
    /// Returns the reason as a plain string; the store attaches the record
    /// index when it turns this into a `MalformedInput` error.
    pub fn validate(&self) -> Result<Bar, String> {
        let symbol = match self.symbol.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            Some(_) => return Err("symbol is empty".into()),
            None => return Err("missing field 'symbol'".into()),
        };
        let timestamp = self
            .timestamp
            .ok_or_else(|| "missing field 'timestamp'".to_string())?;

        let open = price("open", self.open)?;
        let high = price("high", self.high)?;
        let low = price("low", self.low)?;
        let close = price("close", self.close)?;

        let volume = self
            .volume
            .ok_or_else(|| "missing field 'volume'".to_string())?;
        if !volume.is_finite() {
            return Err(format!("volume is not finite: {}", volume));
        }
        if volume < 0.0 {
            return Err(format!("volume is negative: {}", volume));
        }

        Ok(Bar {
            symbol,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

fn price(field: &str, value: Option<f64>) -> Result<f64, String> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(format!("{} is not finite: {}", field, v)),
        None => Err(format!("missing field '{}'", field)),
    }
}

impl From<Bar> for BarRecord {
    fn from(bar: Bar) -> Self {
        Self {
            symbol: Some(bar.symbol),
            timestamp: Some(bar.timestamp),
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BarRecord {
        Bar::new("HK.00700", 1_000, 312.4, 314.4, 312.2, 313.6, 450_500.0).into()
    }

    #[test]
    fn test_valid_record() {
        let bar = record().validate().unwrap();
        assert_eq!(bar.symbol, "HK.00700");
        assert_eq!(bar.close, 313.6);
    }

    #[test]
    fn test_missing_field() {
        let mut rec = record();
        rec.close = None;
        assert_eq!(rec.validate().unwrap_err(), "missing field 'close'");

        let mut rec = record();
        rec.symbol = None;
        assert!(rec.validate().is_err());

        let mut rec = record();
        rec.timestamp = None;
        assert!(rec.validate().is_err());
    }

    #[test]
    fn test_out_of_range_values() {
        let mut rec = record();
        rec.volume = Some(-1.0);
        assert!(rec.validate().unwrap_err().contains("negative"));

        let mut rec = record();
        rec.high = Some(f64::NAN);
        assert!(rec.validate().unwrap_err().contains("not finite"));

        let mut rec = record();
        rec.symbol = Some("  ".into());
        assert_eq!(rec.validate().unwrap_err(), "symbol is empty");
    }

    #[test]
    fn test_zero_volume_is_accepted() {
        let mut rec = record();
        rec.volume = Some(0.0);
        assert!(rec.validate().is_ok());
    }
}
