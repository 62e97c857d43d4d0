pub mod analysis;
pub mod sky_analysis_service;

pub use analysis::{AnalysisConfig, AnalysisRecord, SkyAnalysisOrchestrator};
pub use sky_analysis_service::{SkyAnalysisService, SkyAnalysisServiceBuilder};
