pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use log::info;
use models::{
    analysis::{AnalysisResult, ImportReport},
    holding::EnrichedHolding,
    settings::Settings,
};
use providers::strategy::LookupStrategy;
use services::{
    analysis_service::AnalysisService,
    enrichment_service::{CancelToken, EnrichmentService},
    import_service,
};

use errors::CoreError;

/// Main entry point for the Holdings Advisor core library.
///
/// Runs one import as an explicit pipeline: parse → enrich → analyze.
/// Every call owns its own holdings; nothing is kept between runs.
#[must_use]
pub struct HoldingsAdvisor {
    settings: Settings,
    strategy: LookupStrategy,
    enrichment_service: EnrichmentService,
    analysis_service: AnalysisService,
}

impl std::fmt::Debug for HoldingsAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldingsAdvisor")
            .field("strategy", &self.strategy)
            .field("thresholds", &self.settings.thresholds)
            .finish()
    }
}

impl HoldingsAdvisor {
    /// Build an advisor whose price source is chosen from `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let strategy = LookupStrategy::from_settings(&settings)?;
        Ok(Self::build(settings, strategy))
    }

    /// Build an advisor around an explicit price source.
    pub fn with_strategy(settings: Settings, strategy: LookupStrategy) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings, strategy))
    }

    fn build(settings: Settings, strategy: LookupStrategy) -> Self {
        Self {
            enrichment_service: EnrichmentService::new(settings.request_timeout()),
            analysis_service: AnalysisService::new(settings.thresholds),
            settings,
            strategy,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn strategy(&self) -> &LookupStrategy {
        &self.strategy
    }

    /// Import portfolio text end to end.
    ///
    /// Fails with `CoreError::Input` when the text is empty or holds no valid
    /// rows, `SourceUnavailable` when a bulk source can't be fetched, and
    /// `Cancelled` when `cancel` fires between lookups.
    pub async fn import(&self, raw: &str, cancel: &CancelToken) -> Result<ImportReport, CoreError> {
        let parsed = import_service::parse_holdings_report(raw)?;
        if parsed.holdings.is_empty() {
            return Err(CoreError::Input(format!(
                "No valid holdings found ({} row(s) rejected)",
                parsed.rejected_rows
            )));
        }
        info!(
            "Parsed {} holding(s), rejected {} row(s)",
            parsed.holdings.len(),
            parsed.rejected_rows
        );

        let enriched = self
            .enrichment_service
            .enrich(parsed.holdings, &self.strategy, cancel)
            .await?;

        let result = self.analysis_service.analyze(enriched);
        Ok(ImportReport::new(result, parsed.rejected_rows))
    }

    /// Read a UTF-8 portfolio file and import it.
    pub async fn import_file(
        &self,
        path: impl AsRef<std::path::Path>,
        cancel: &CancelToken,
    ) -> Result<ImportReport, CoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::Input(format!("Cannot read {}: {e}", path.display()))
        })?;
        self.import(&raw, cancel).await
    }

    /// Analyze holdings that were priced elsewhere.
    #[must_use]
    pub fn analyze(&self, enriched: Vec<EnrichedHolding>) -> AnalysisResult {
        self.analysis_service.analyze(enriched)
    }
}
