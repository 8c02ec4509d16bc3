use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One portfolio position as read from the import file.
///
/// Immutable once parsed. The current market price lives on
/// [`EnrichedHolding`], never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Security code used as the price lookup key (e.g., "7203").
    /// Not guaranteed unique across a file.
    pub code: String,

    /// Display label. May be empty.
    pub name: String,

    /// Number of shares held.
    pub count: u64,

    /// Price paid per share, always finite and > 0.
    pub purchase_price: f64,
}

impl Holding {
    /// Build a holding, enforcing the record invariants.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        count: u64,
        purchase_price: f64,
    ) -> Result<Self, CoreError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(CoreError::Input("Security code must not be empty".into()));
        }
        if !purchase_price.is_finite() || purchase_price <= 0.0 {
            return Err(CoreError::Input(format!(
                "Purchase price for {code} must be a positive number, got {purchase_price}"
            )));
        }
        Ok(Self {
            code,
            name: name.into(),
            count,
            purchase_price,
        })
    }

    /// Total paid for the position: `purchase_price × count`.
    pub fn purchase_value(&self) -> f64 {
        self.purchase_price * self.count as f64
    }
}

/// Current market price of a holding.
///
/// `Unresolved` means no price could be obtained. It is deliberately a
/// separate state from `Resolved(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Price {
    Resolved(f64),
    Unresolved,
}

impl Price {
    /// Accept a quote only if it is a finite, non-negative number.
    pub fn from_quote(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            Price::Resolved(value)
        } else {
            Price::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Price::Resolved(_))
    }

    /// The resolved value, or `None` for an unresolved price.
    pub fn value(&self) -> Option<f64> {
        match self {
            Price::Resolved(v) => Some(*v),
            Price::Unresolved => None,
        }
    }

    /// Worst-case valuation: unresolved counts as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Resolved(v) => write!(f, "{v}"),
            Price::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// A holding with its current price attached by the enricher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub holding: Holding,
    pub current_price: Price,
}

impl EnrichedHolding {
    pub fn new(holding: Holding, current_price: Price) -> Self {
        Self {
            holding,
            current_price,
        }
    }

    /// A holding whose price could not be looked up.
    pub fn unresolved(holding: Holding) -> Self {
        Self::new(holding, Price::Unresolved)
    }
}
