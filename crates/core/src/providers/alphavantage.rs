use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::QuotePriceSource;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_NAME: &str = "Alpha Vantage";

/// Alpha Vantage API provider for equity quotes, one code per request.
///
/// - **Free tier**: a handful of requests per minute, so callers must pace
///   requests (see `LookupStrategy::PerItem`).
/// - **Requires**: API key (set via settings as "alphavantage").
/// - **Codes**: exchange-local codes need a suffix (e.g., "7203.T"), which
///   can be appended automatically via `symbol_suffix`.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    symbol_suffix: Option<String>,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            symbol_suffix: None,
        }
    }

    pub fn with_symbol_suffix(mut self, suffix: Option<String>) -> Self {
        self.symbol_suffix = suffix.filter(|s| !s.is_empty());
        self
    }

    /// The symbol actually sent to the API for a portfolio code.
    pub fn symbol_for(&self, code: &str) -> String {
        let upper = code.to_uppercase();
        match &self.symbol_suffix {
            Some(suffix) if !upper.ends_with(&suffix.to_uppercase()) => {
                format!("{upper}{}", suffix.to_uppercase())
            }
            _ => upper,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

/// Extract the price from a `GLOBAL_QUOTE` response body.
///
/// The quote object, or its price field, is missing for unknown symbols and
/// when the rate limit is hit; both are reported as `CoreError::Api`.
pub fn parse_global_quote(code: &str, body: &str) -> Result<f64, CoreError> {
    let resp: GlobalQuoteResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Failed to parse quote for {code}: {e}"),
    })?;

    if let Some(notice) = resp.note.or(resp.information) {
        return Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("No quote for {code}: {notice}"),
        });
    }

    let price_str = resp
        .global_quote
        .and_then(|q| q.price)
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("No quote data for {code}"),
        })?;

    let price: f64 = price_str.trim().parse().map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Invalid price format for {code}: {e}"),
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid price returned for {code}: {price}"),
        });
    }
    Ok(price)
}

#[async_trait]
impl QuotePriceSource for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_one(&self, code: &str) -> Result<f64, CoreError> {
        let symbol = self.symbol_for(code);
        let body = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_global_quote(code, &body)
    }
}
