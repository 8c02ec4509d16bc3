use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::holding::{EnrichedHolding, Holding, Price};
use crate::models::settings::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::providers::strategy::LookupStrategy;
use crate::providers::traits::{BulkPriceSource, QuotePriceSource};

/// Cancellation handle for one import run.
///
/// Clones share the same flag. A cancellation is honoured at the next
/// suspension point between lookups, never in the middle of a request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once `cancel()` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        let closed = receiver.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            // The sender lives as long as any clone of this token, so this
            // only happens during teardown. Never resolve.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches a current price to each holding.
///
/// Per-item failures (transport, malformed response, missing price, timeout)
/// degrade that holding to `Price::Unresolved` and never abort the batch.
/// Output always has the input's length and order.
pub struct EnrichmentService {
    request_timeout: Duration,
}

impl EnrichmentService {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }

    pub async fn enrich(
        &self,
        holdings: Vec<Holding>,
        strategy: &LookupStrategy,
        cancel: &CancelToken,
    ) -> Result<Vec<EnrichedHolding>, CoreError> {
        info!(
            "Enriching {} holding(s) via {}",
            holdings.len(),
            strategy.source_name()
        );

        let enriched = match strategy {
            LookupStrategy::Bulk(source) => {
                self.enrich_bulk(holdings, source.as_ref(), cancel).await?
            }
            LookupStrategy::PerItem { source, interval } => {
                self.enrich_per_item(holdings, source.as_ref(), *interval, cancel)
                    .await?
            }
        };

        let resolved = enriched
            .iter()
            .filter(|e| e.current_price.is_resolved())
            .count();
        info!("Priced {resolved}/{} holding(s)", enriched.len());
        Ok(enriched)
    }

    async fn enrich_bulk(
        &self,
        holdings: Vec<Holding>,
        source: &dyn BulkPriceSource,
        cancel: &CancelToken,
    ) -> Result<Vec<EnrichedHolding>, CoreError> {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled { resolved: 0 });
        }

        let prices = match tokio::time::timeout(self.request_timeout, source.fetch_bulk()).await {
            Ok(Ok(prices)) => prices,
            Ok(Err(e)) => {
                return Err(CoreError::SourceUnavailable {
                    source_name: source.name().to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(CoreError::SourceUnavailable {
                    source_name: source.name().to_string(),
                    message: format!(
                        "no response within {} ms",
                        self.request_timeout.as_millis()
                    ),
                })
            }
        };

        Ok(holdings
            .into_iter()
            .map(|holding| {
                let price = match prices.get(&holding.code) {
                    Some(&value) => Price::from_quote(value),
                    None => {
                        debug!("{}: no price row for {}", source.name(), holding.code);
                        Price::Unresolved
                    }
                };
                EnrichedHolding::new(holding, price)
            })
            .collect())
    }

    async fn enrich_per_item(
        &self,
        holdings: Vec<Holding>,
        source: &dyn QuotePriceSource,
        interval: Duration,
        cancel: &CancelToken,
    ) -> Result<Vec<EnrichedHolding>, CoreError> {
        let mut enriched = Vec::with_capacity(holdings.len());

        for (idx, holding) in holdings.into_iter().enumerate() {
            if idx > 0 && !interval.is_zero() {
                debug!("Waiting {interval:?} before next quote request");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return Err(CoreError::Cancelled { resolved: enriched.len() });
                    }
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled {
                    resolved: enriched.len(),
                });
            }

            let price = self.lookup_one(source, &holding.code).await;
            enriched.push(EnrichedHolding::new(holding, price));
        }

        Ok(enriched)
    }

    async fn lookup_one(&self, source: &dyn QuotePriceSource, code: &str) -> Price {
        let result = match tokio::time::timeout(self.request_timeout, source.fetch_one(code)).await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                code: code.to_string(),
                after_ms: self.request_timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(value) => {
                let price = Price::from_quote(value);
                if !price.is_resolved() {
                    warn!("{}: discarding invalid price {value} for {code}", source.name());
                }
                price
            }
            Err(e) => {
                warn!("{}: price lookup failed for {code}: {e}", source.name());
                Price::Unresolved
            }
        }
    }
}

impl Default for EnrichmentService {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }
}
