use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::holding::EnrichedHolding;

/// Profit/loss figures for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub code: String,
    pub name: String,
    pub count: u64,
    pub purchase_price: f64,

    /// Price used for valuation; 0 when the lookup failed.
    pub current_price: f64,

    /// False when `current_price` is a stand-in for an unresolved lookup.
    pub price_resolved: bool,

    /// current_price × count
    pub current_value: f64,

    /// purchase_price × count
    pub purchase_value: f64,

    /// current_value − purchase_value
    pub profit_loss: f64,

    /// profit_loss / purchase_value × 100, `None` when nothing was paid (count 0).
    pub profit_loss_rate: Option<f64>,
}

/// Aggregate figures across the whole portfolio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub purchase_value: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_rate: Option<f64>,

    /// Holdings valued at 0 because no price was found.
    pub unresolved_count: usize,
}

/// Recommendation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdviceKind {
    /// Deep in loss: candidate for buying more (averaging down).
    Accumulate,
    /// Well in profit: candidate for realizing gains.
    TakeProfit,
    /// Nothing in the portfolio calls for action.
    Hold,
}

impl std::fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdviceKind::Accumulate => write!(f, "Accumulate"),
            AdviceKind::TakeProfit => write!(f, "Take profit"),
            AdviceKind::Hold => write!(f, "Hold"),
        }
    }
}

/// One advice entry. Per-holding entries carry the holding's code and name;
/// the portfolio-level `Hold` entry carries neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub kind: AdviceKind,
    pub code: Option<String>,
    pub name: Option<String>,
    pub profit_loss_rate: Option<f64>,
}

impl Advice {
    pub fn for_holding(kind: AdviceKind, metrics: &Metrics) -> Self {
        Self {
            kind,
            code: Some(metrics.code.clone()),
            name: Some(metrics.name.clone()),
            profit_loss_rate: metrics.profit_loss_rate,
        }
    }

    pub fn hold() -> Self {
        Self {
            kind: AdviceKind::Hold,
            code: None,
            name: None,
            profit_loss_rate: None,
        }
    }
}

/// Everything the presentation layer needs: priced holdings, their metrics,
/// portfolio totals and advice. `holdings` and `metrics` are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub holdings: Vec<EnrichedHolding>,
    pub metrics: Vec<Metrics>,
    pub totals: PortfolioTotals,
    pub advice: Vec<Advice>,
}

/// Outcome of one full import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub result: AnalysisResult,

    /// Data lines dropped by the tolerant parser.
    pub rejected_rows: usize,

    pub imported_at: DateTime<Utc>,
}

impl ImportReport {
    /// Stamp an analysis with the current time.
    pub fn new(result: AnalysisResult, rejected_rows: usize) -> Self {
        Self {
            result,
            rejected_rows,
            imported_at: Utc::now(),
        }
    }
}
