use std::fmt::Write;

use holdings_advisor_core::models::analysis::{Advice, AdviceKind, ImportReport, Metrics};

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn rate(value: Option<f64>) -> String {
    match value {
        Some(r) => format!("{r:+.2}%"),
        None => "n/a".to_string(),
    }
}

fn holding_label(m: &Metrics) -> String {
    if m.name.is_empty() {
        m.code.clone()
    } else {
        format!("{} ({})", m.name, m.code)
    }
}

fn advice_line(advice: &Advice) -> String {
    let who = match (&advice.name, &advice.code) {
        (Some(name), Some(code)) if !name.is_empty() => format!("{name} ({code})"),
        (_, Some(code)) => code.clone(),
        _ => String::new(),
    };
    match advice.kind {
        AdviceKind::Accumulate => format!(
            "Accumulate: {who} is down {}; consider averaging down.",
            rate(advice.profit_loss_rate)
        ),
        AdviceKind::TakeProfit => format!(
            "Take profit: {who} is up {}; consider realizing gains.",
            rate(advice.profit_loss_rate)
        ),
        AdviceKind::Hold => "Hold: no holding needs action right now.".to_string(),
    }
}

/// Plain-text table of holdings, totals and advice.
pub fn render_report(report: &ImportReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<28} {:>8} {:>12} {:>12} {:>14} {:>14} {:>9}",
        "Holding", "Count", "Bought", "Current", "Value", "P/L", "P/L %"
    );
    for m in &result.metrics {
        let current = if m.price_resolved {
            money(m.current_price)
        } else {
            "n/a".to_string()
        };
        let _ = writeln!(
            out,
            "{:<28} {:>8} {:>12} {:>12} {:>14} {:>14} {:>9}",
            holding_label(m),
            m.count,
            money(m.purchase_price),
            current,
            money(m.current_value),
            money(m.profit_loss),
            rate(m.profit_loss_rate),
        );
    }

    let totals = &result.totals;
    let _ = writeln!(
        out,
        "\nTotal: invested {}, now {}, P/L {} ({})",
        money(totals.purchase_value),
        money(totals.current_value),
        money(totals.profit_loss),
        rate(totals.profit_loss_rate),
    );
    if totals.unresolved_count > 0 {
        let _ = writeln!(
            out,
            "{} holding(s) could not be priced and are valued at 0.",
            totals.unresolved_count
        );
    }
    if report.rejected_rows > 0 {
        let _ = writeln!(out, "{} malformed row(s) skipped.", report.rejected_rows);
    }

    let _ = writeln!(out, "\nAdvice:");
    for advice in &result.advice {
        let _ = writeln!(out, "  - {}", advice_line(advice));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdings_advisor_core::models::holding::{EnrichedHolding, Holding, Price};
    use holdings_advisor_core::services::analysis_service::AnalysisService;

    fn report(enriched: Vec<EnrichedHolding>, rejected_rows: usize) -> ImportReport {
        ImportReport::new(AnalysisService::default().analyze(enriched), rejected_rows)
    }

    #[test]
    fn unresolved_price_is_shown_as_na() {
        let h = Holding::new("9984", "Soft", 5, 6000.0).unwrap();
        let text = render_report(&report(vec![EnrichedHolding::unresolved(h)], 0));
        assert!(text.contains("Soft (9984)"));
        assert!(text.contains("n/a"));
        assert!(text.contains("1 holding(s) could not be priced"));
    }

    #[test]
    fn advice_lines_name_the_holding() {
        let toyota = Holding::new("7203", "ToyotaCo", 10, 8000.0).unwrap();
        let soft = Holding::new("9984", "Soft", 5, 6000.0).unwrap();
        let text = render_report(&report(
            vec![
                EnrichedHolding::new(toyota, Price::Resolved(7100.0)),
                EnrichedHolding::new(soft, Price::Resolved(7300.0)),
            ],
            2,
        ));
        assert!(text.contains("Accumulate: ToyotaCo (7203) is down -11.25%"));
        assert!(text.contains("Take profit: Soft (9984) is up +21.67%"));
        assert!(text.contains("2 malformed row(s) skipped."));
        assert!(!text.contains("Hold:"));
    }

    #[test]
    fn hold_line_when_nothing_triggers() {
        let h = Holding::new("6758", "Sony", 3, 3000.0).unwrap();
        let text = render_report(&report(
            vec![EnrichedHolding::new(h, Price::Resolved(3100.0))],
            0,
        ));
        assert!(text.contains("Hold: no holding needs action right now."));
    }
}
