use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::Settings;

use super::alphavantage::AlphaVantageProvider;
use super::spreadsheet::SpreadsheetExportSource;
use super::traits::{BulkPriceSource, QuotePriceSource};

/// How the enricher obtains prices.
///
/// Both variants satisfy the same contract: one `EnrichedHolding` per input
/// holding, in input order.
pub enum LookupStrategy {
    /// One round trip for the whole portfolio.
    Bulk(Box<dyn BulkPriceSource>),

    /// One round trip per holding, strictly sequential, with at least
    /// `interval` between the end of one request and the start of the next.
    PerItem {
        source: Box<dyn QuotePriceSource>,
        interval: Duration,
    },
}

impl LookupStrategy {
    pub fn bulk(source: impl BulkPriceSource + 'static) -> Self {
        LookupStrategy::Bulk(Box::new(source))
    }

    pub fn per_item(source: impl QuotePriceSource + 'static, interval: Duration) -> Self {
        LookupStrategy::PerItem {
            source: Box::new(source),
            interval,
        }
    }

    /// Pick a strategy from configuration.
    ///
    /// A spreadsheet export wins over the quote API when both are present:
    /// it costs one request and no quota.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let timeout = settings.request_timeout();

        if let Some(url) = settings
            .spreadsheet_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            return Ok(Self::bulk(SpreadsheetExportSource::new(url, timeout)));
        }

        if let Some(key) = settings.api_key("alphavantage") {
            let provider = AlphaVantageProvider::new(key.to_string(), timeout)
                .with_symbol_suffix(settings.symbol_suffix.clone());
            return Ok(Self::per_item(provider, settings.request_interval()));
        }

        Err(CoreError::Config(
            "No price source configured: set a spreadsheet URL or an \"alphavantage\" API key"
                .into(),
        ))
    }

    /// Name of the underlying source (for logs/errors).
    pub fn source_name(&self) -> &str {
        match self {
            LookupStrategy::Bulk(source) => source.name(),
            LookupStrategy::PerItem { source, .. } => source.name(),
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, LookupStrategy::Bulk(_))
    }
}

impl std::fmt::Debug for LookupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupStrategy::Bulk(source) => f.debug_tuple("Bulk").field(&source.name()).finish(),
            LookupStrategy::PerItem { source, interval } => f
                .debug_struct("PerItem")
                .field("source", &source.name())
                .field("interval", interval)
                .finish(),
        }
    }
}
