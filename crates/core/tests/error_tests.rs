// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use holdings_advisor_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn input() {
        let err = CoreError::Input("Portfolio text is empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid portfolio input: Portfolio text is empty"
        );
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Alpha Vantage".into(),
            message: "No quote data for 7203".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (Alpha Vantage): No quote data for 7203"
        );
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn source_unavailable() {
        let err = CoreError::SourceUnavailable {
            source_name: "Spreadsheet export".into(),
            message: "HTTP 404".into(),
        };
        assert_eq!(
            err.to_string(),
            "Price source unavailable (Spreadsheet export): HTTP 404"
        );
    }

    #[test]
    fn timeout() {
        let err = CoreError::Timeout {
            code: "9984".into(),
            after_ms: 1500,
        };
        assert_eq!(
            err.to_string(),
            "Price lookup for 9984 timed out after 1500 ms"
        );
    }

    #[test]
    fn cancelled() {
        let err = CoreError::Cancelled { resolved: 2 };
        assert_eq!(
            err.to_string(),
            "Import cancelled after 2 holding(s) were priced"
        );
    }

    #[test]
    fn config() {
        let err = CoreError::Config("no price source".into());
        assert_eq!(err.to_string(), "Configuration error: no price source");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CoreError>();
    }

    #[test]
    fn implements_std_error() {
        use std::error::Error as _;
        let err: Box<dyn std::error::Error> = Box::new(CoreError::Cancelled { resolved: 0 });
        assert!(err.source().is_none());
    }
}
