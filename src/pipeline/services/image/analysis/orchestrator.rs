/// Sky Analysis Orchestrator - runs the enabled analyzers and blends their scores
use super::{
    brightness_analyzer::{BrightnessAnalyzer, BrightnessResult},
    color_analyzer::{ColorAnalyzer, ColorResult},
    config::{AnalysisConfig, EnabledAnalyzers, ScoreBlending},
    core::{clamp_score, SkyAnalyzer},
    record::AnalysisRecord,
    sky_feature_analyzer::{FeatureResult, SkyFeatureAnalyzer},
};
use crate::error::AppError;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, info};

/// Main orchestrator for sky analysis. Holds no per-image state, so one
/// instance can serve any number of threads.
pub struct SkyAnalysisOrchestrator {
    brightness: BrightnessAnalyzer,
    color: ColorAnalyzer,
    features: SkyFeatureAnalyzer,
    config: AnalysisConfig,
}

impl SkyAnalysisOrchestrator {
    pub fn new(config: AnalysisConfig) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::InvalidConfig(format!("Invalid analysis config: {}", e)))?;

        Ok(Self {
            brightness: BrightnessAnalyzer::new(&config.brightness),
            color: ColorAnalyzer::new(&config.color),
            features: SkyFeatureAnalyzer::new(config.sample_rate, &config.pixel, &config.coverage),
            config,
        })
    }

    /// Analyze with the analyzers enabled in the configuration
    pub fn analyze(&self, image: &RgbImage) -> AnalysisRecord {
        self.analyze_with(image, self.config.enabled_analyzers)
    }

    /// Analyze with an explicit set of enabled analyzers. The clear-sky score
    /// and sky condition are only present when brightness and color both ran.
    pub fn analyze_with(&self, image: &RgbImage, enabled: EnabledAnalyzers) -> AnalysisRecord {
        let analysis_start = Instant::now();
        let mut record = AnalysisRecord::default();

        if enabled.brightness {
            record.brightness = Some(self.run(&self.brightness, image));
        }

        if enabled.color {
            record.color = Some(self.run(&self.color, image));
        }

        if enabled.features {
            record.features = Some(self.run(&self.features, image));
        }

        if let (Some(brightness), Some(color)) = (&record.brightness, &record.color) {
            record.clear_sky_score = Some(calculate_clear_sky_score(
                brightness,
                color,
                record.features.as_ref(),
                &self.config.blending,
            ));
            record.sky_condition = Some(color.condition);
        }

        info!(
            "Sky analysis of {}x{} image completed in {}us: score {:?}, condition {:?}",
            image.width(),
            image.height(),
            analysis_start.elapsed().as_micros(),
            record.clear_sky_score,
            record.sky_condition
        );

        record
    }

    /// A missing image is analyzed as a zero-area one.
    pub fn analyze_optional(
        &self,
        image: Option<&RgbImage>,
        enabled: EnabledAnalyzers,
    ) -> AnalysisRecord {
        match image {
            Some(image) => self.analyze_with(image, enabled),
            None => self.analyze_with(&RgbImage::new(0, 0), enabled),
        }
    }

    fn run<A: SkyAnalyzer>(&self, analyzer: &A, image: &RgbImage) -> A::Output {
        let start = Instant::now();
        let output = analyzer.analyze(image);
        debug!("{} finished in {}us", analyzer.name(), start.elapsed().as_micros());
        output
    }
}

/// Blend brightness and color scores, then nudge by feature coverage.
/// The result is truncated, not rounded.
pub fn calculate_clear_sky_score(
    brightness: &BrightnessResult,
    color: &ColorResult,
    features: Option<&FeatureResult>,
    blending: &ScoreBlending,
) -> u8 {
    let base = (f64::from(brightness.score) + f64::from(color.blue_sky_score)) / 2.0;

    let adjusted = match features {
        Some(features) => adjust_score_by_features(base, features, blending),
        None => base,
    };

    clamp_score(adjusted.trunc())
}

fn adjust_score_by_features(base: f64, features: &FeatureResult, blending: &ScoreBlending) -> f64 {
    if features.blue_coverage > blending.blue_coverage_boost_above {
        base * blending.blue_coverage_boost
    } else if features.gray_coverage > blending.gray_coverage_penalty_above {
        base * blending.gray_coverage_penalty
    } else {
        base
    }
}
