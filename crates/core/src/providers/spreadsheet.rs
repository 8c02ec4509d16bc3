use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::BulkPriceSource;

const PROVIDER_NAME: &str = "Spreadsheet export";

/// Bulk price source backed by a published spreadsheet CSV export.
///
/// The sheet is expected to hold `code,price` rows. Anything that does not
/// look like one (header, blank line, formula error text) is skipped.
pub struct SpreadsheetExportSource {
    client: Client,
    url: String,
}

impl SpreadsheetExportSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url: url.into(),
        }
    }
}

/// Parse `code,price` rows into a lookup map.
///
/// Later rows win when a code repeats.
pub fn parse_price_table(text: &str) -> HashMap<String, f64> {
    let mut prices = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        let cols: Vec<&str> = line.split(',').collect();
        if cols.len() < 2 {
            continue;
        }
        let code = cols[0].trim();
        let parsed = cols[1].trim().parse::<f64>();
        match parsed {
            Ok(price) if !code.is_empty() && price.is_finite() => {
                prices.insert(code.to_string(), price);
            }
            _ => debug!("Skipping price row {}: {:?}", idx + 1, line),
        }
    }
    prices
}

#[async_trait]
impl BulkPriceSource for SpreadsheetExportSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_bulk(&self) -> Result<HashMap<String, f64>, CoreError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} from spreadsheet export"),
            });
        }

        let body = resp.text().await?;
        let prices = parse_price_table(&body);
        debug!("{PROVIDER_NAME}: {} price row(s) loaded", prices.len());
        Ok(prices)
    }
}
