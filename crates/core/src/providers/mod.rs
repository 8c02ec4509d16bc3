pub mod strategy;
pub mod traits;

// Price source implementations
pub mod alphavantage;
pub mod spreadsheet;
