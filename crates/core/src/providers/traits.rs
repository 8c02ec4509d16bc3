use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;

/// A price source that resolves every code in one round trip
/// (e.g., a published spreadsheet export).
///
/// Codes missing from the returned map are treated as unresolved by the
/// enricher; implementations should simply leave them out.
#[async_trait]
pub trait BulkPriceSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full `code → price` mapping.
    async fn fetch_bulk(&self) -> Result<HashMap<String, f64>, CoreError>;
}

/// A price source that answers one code per round trip
/// (e.g., a quoted-equity API with a request quota).
#[async_trait]
pub trait QuotePriceSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current price for a single security code.
    async fn fetch_one(&self, code: &str) -> Result<f64, CoreError>;
}
