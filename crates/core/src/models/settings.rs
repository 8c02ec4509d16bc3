use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;

/// Pacing observed for the free quote API tier.
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Profit/loss rate thresholds (in percent) that trigger advice.
/// Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceThresholds {
    /// rate < this → Accumulate
    pub accumulate_below: f64,
    /// rate > this → TakeProfit
    pub take_profit_above: f64,
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        Self {
            accumulate_below: -10.0,
            take_profit_above: 20.0,
        }
    }
}

/// User-supplied configuration. Credentials come from here (or the
/// environment, via the CLI), never from code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API keys for providers that require them, keyed by provider id
    /// (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,

    /// Published spreadsheet CSV export with `code,price` rows.
    /// When set, prices are fetched in a single bulk request.
    pub spreadsheet_url: Option<String>,

    /// Appended to each code for per-item quote lookups (e.g., ".T").
    pub symbol_suffix: Option<String>,

    /// Minimum pause between two per-item quote requests.
    pub request_interval_ms: u64,

    /// Upper bound on a single quote round trip.
    pub request_timeout_secs: u64,

    pub thresholds: AdviceThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            spreadsheet_url: None,
            symbol_suffix: None,
            request_interval_ms: DEFAULT_REQUEST_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            thresholds: AdviceThresholds::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        let t = &self.thresholds;
        if !t.accumulate_below.is_finite() || !t.take_profit_above.is_finite() {
            return Err(CoreError::Config("Advice thresholds must be finite".into()));
        }
        if t.accumulate_below >= t.take_profit_above {
            return Err(CoreError::Config(format!(
                "accumulate_below ({}) must be lower than take_profit_above ({})",
                t.accumulate_below, t.take_profit_above
            )));
        }
        Ok(())
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Look up an API key, ignoring blank values.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }
}
