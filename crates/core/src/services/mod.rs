pub mod analysis_service;
pub mod enrichment_service;
pub mod import_service;
