use thiserror::Error;

/// Unified error type for the entire holdings-advisor-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Invalid portfolio input: {0}")]
    Input(String),

    // ── Price lookup / Network ──────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Price source unavailable ({source_name}): {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Price lookup for {code} timed out after {after_ms} ms")]
    Timeout { code: String, after_ms: u64 },

    #[error("Import cancelled after {resolved} holding(s) were priced")]
    Cancelled { resolved: usize },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, and the quote API takes its key
        // as a query parameter. Never let it reach a message or a log line.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` of a message that may embed a URL.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
