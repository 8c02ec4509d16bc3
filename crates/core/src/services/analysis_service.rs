use crate::models::analysis::{Advice, AdviceKind, AnalysisResult, Metrics, PortfolioTotals};
use crate::models::holding::EnrichedHolding;
use crate::models::settings::AdviceThresholds;

/// Computes profit/loss metrics and rule-based advice.
///
/// Pure: no I/O, output depends only on the enriched holdings and the
/// configured thresholds.
pub struct AnalysisService {
    thresholds: AdviceThresholds,
}

impl AnalysisService {
    pub fn new(thresholds: AdviceThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AdviceThresholds {
        &self.thresholds
    }

    /// Metrics, totals and advice for a priced portfolio.
    ///
    /// Per-holding advice keeps input order. When no holding crosses a
    /// threshold, the advice is a single portfolio-level `Hold`.
    pub fn analyze(&self, enriched: Vec<EnrichedHolding>) -> AnalysisResult {
        let metrics: Vec<Metrics> = enriched.iter().map(compute_metrics).collect();

        let mut advice: Vec<Advice> = metrics
            .iter()
            // An unresolved price would read as a -100% loss; don't advise on it.
            .filter(|m| m.price_resolved)
            .filter_map(|m| {
                let rate = m.profit_loss_rate?;
                self.classify(rate).map(|kind| Advice::for_holding(kind, m))
            })
            .collect();

        if advice.is_empty() {
            advice.push(Advice::hold());
        }

        let totals = totals(&metrics);

        AnalysisResult {
            holdings: enriched,
            metrics,
            totals,
            advice,
        }
    }

    /// Map a profit/loss rate (percent) to an advice kind, if any.
    /// Both thresholds are strict: exactly -10 or exactly 20 triggers nothing.
    pub fn classify(&self, rate: f64) -> Option<AdviceKind> {
        if rate < self.thresholds.accumulate_below {
            Some(AdviceKind::Accumulate)
        } else if rate > self.thresholds.take_profit_above {
            Some(AdviceKind::TakeProfit)
        } else {
            None
        }
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new(AdviceThresholds::default())
    }
}

/// Profit/loss figures for one holding. Unresolved prices are valued at 0.
pub fn compute_metrics(enriched: &EnrichedHolding) -> Metrics {
    let holding = &enriched.holding;
    let current_price = enriched.current_price.value_or_zero();
    let count = holding.count as f64;

    let current_value = current_price * count;
    let purchase_value = holding.purchase_value();
    let profit_loss = current_value - purchase_value;

    Metrics {
        code: holding.code.clone(),
        name: holding.name.clone(),
        count: holding.count,
        purchase_price: holding.purchase_price,
        current_price,
        price_resolved: enriched.current_price.is_resolved(),
        current_value,
        purchase_value,
        profit_loss,
        profit_loss_rate: rate_of(profit_loss, purchase_value),
    }
}

/// Portfolio-wide sums over per-holding metrics.
pub fn totals(metrics: &[Metrics]) -> PortfolioTotals {
    let purchase_value: f64 = metrics.iter().map(|m| m.purchase_value).sum();
    let current_value: f64 = metrics.iter().map(|m| m.current_value).sum();
    let profit_loss = current_value - purchase_value;

    PortfolioTotals {
        purchase_value,
        current_value,
        profit_loss,
        profit_loss_rate: rate_of(profit_loss, purchase_value),
        unresolved_count: metrics.iter().filter(|m| !m.price_resolved).count(),
    }
}

fn rate_of(profit_loss: f64, purchase_value: f64) -> Option<f64> {
    if purchase_value > 0.0 {
        Some(profit_loss / purchase_value * 100.0)
    } else {
        None
    }
}
