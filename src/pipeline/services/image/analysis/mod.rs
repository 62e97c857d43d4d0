pub mod brightness_analyzer;
pub mod color_analyzer;
pub mod config;
pub mod core;
pub mod orchestrator;
pub mod pixel_classifier;
pub mod record;
pub mod sky_feature_analyzer;

pub use brightness_analyzer::{BrightnessAnalyzer, BrightnessCondition, BrightnessResult};
pub use color_analyzer::{ColorAnalyzer, ColorResult, SkyCondition};
pub use self::config::{
    AnalysisConfig, AnalyzerKind, BrightnessThresholds, ColorThresholds, CoverageThresholds,
    EnabledAnalyzers, PixelThresholds, ScoreBlending,
};
pub use self::core::{DecisionTable, SkyAnalyzer};
pub use orchestrator::{calculate_clear_sky_score, SkyAnalysisOrchestrator};
pub use pixel_classifier::{PixelClassifier, PixelType};
pub use record::AnalysisRecord;
pub use sky_feature_analyzer::{CoverageAssessment, FeatureResult, SkyFeatureAnalyzer};
