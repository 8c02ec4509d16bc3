use log::debug;

use crate::errors::CoreError;
use crate::models::holding::Holding;

/// Column delimiter of the portfolio file. Quoting is not supported.
pub const DELIMITER: char = ',';

/// Result of a tolerant parse, with the number of dropped data lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImport {
    pub holdings: Vec<Holding>,
    pub rejected_rows: usize,
}

/// Parse portfolio text (`code,name,count,purchasePrice` after one header
/// line) into holdings.
///
/// Malformed rows are dropped silently; trailing junk must not abort an
/// import. Fails only when the text holds no lines at all.
pub fn parse_holdings(raw: &str) -> Result<Vec<Holding>, CoreError> {
    parse_holdings_report(raw).map(|parsed| parsed.holdings)
}

/// Same acceptance rules as [`parse_holdings`], also counting the rejected
/// data lines.
pub fn parse_holdings_report(raw: &str) -> Result<ParsedImport, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Input("Portfolio text is empty".into()));
    }

    let mut holdings = Vec::new();
    let mut rejected_rows = 0;

    // Line 1 is the header, whatever it says.
    for (idx, line) in trimmed.lines().enumerate().skip(1) {
        match parse_row(line) {
            Some(holding) => holdings.push(holding),
            None => {
                rejected_rows += 1;
                debug!("Rejected portfolio row {}: {:?}", idx + 1, line);
            }
        }
    }

    Ok(ParsedImport {
        holdings,
        rejected_rows,
    })
}

fn parse_row(line: &str) -> Option<Holding> {
    let cols: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if cols.len() < 4 {
        return None;
    }

    let count: u64 = cols[2].parse().ok()?;
    let purchase_price: f64 = cols[3].parse().ok()?;

    Holding::new(cols[0], cols[1], count, purchase_price).ok()
}
