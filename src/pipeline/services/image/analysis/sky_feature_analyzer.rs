use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::{CoverageThresholds, PixelThresholds};
use super::core::{round_to, DecisionTable, SkyAnalyzer};
use super::pixel_classifier::{PixelClassifier, PixelType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageAssessment {
    MostlyClear,
    MostlyCloudy,
    PartlyCloudy,
    Mixed,
}

impl CoverageAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            CoverageAssessment::MostlyClear => "Mostly clear",
            CoverageAssessment::MostlyCloudy => "Mostly cloudy",
            CoverageAssessment::PartlyCloudy => "Partly cloudy",
            CoverageAssessment::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub blue_coverage: f64,
    pub gray_coverage: f64,
    pub white_coverage: f64,
    pub assessment: CoverageAssessment,
    pub pixels_sampled: u64,
}

/// Tally of classified grid points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelCounts {
    pub blue: u64,
    pub white: u64,
    pub gray: u64,
    pub total: u64,
}

impl PixelCounts {
    pub fn record(&mut self, pixel_type: PixelType) {
        match pixel_type {
            PixelType::Blue => self.blue += 1,
            PixelType::White => self.white += 1,
            PixelType::Gray => self.gray += 1,
            PixelType::Other => {}
        }
        self.total += 1;
    }

    pub fn other(&self) -> u64 {
        self.total - self.blue - self.white - self.gray
    }

    /// Unrounded percentages; all zero when nothing was sampled.
    pub fn coverage(&self) -> Coverage {
        if self.total == 0 {
            return Coverage::default();
        }

        let total = self.total as f64;
        Coverage {
            blue: self.blue as f64 / total * 100.0,
            gray: self.gray as f64 / total * 100.0,
            white: self.white as f64 / total * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coverage {
    pub blue: f64,
    pub gray: f64,
    pub white: f64,
}

/// Strided-grid sampling of pixel types and coverage assessment
pub struct SkyFeatureAnalyzer {
    sample_rate: u32,
    classifier: PixelClassifier,
    assessments: DecisionTable<Coverage, CoverageAssessment>,
}

impl SkyFeatureAnalyzer {
    pub fn new(
        sample_rate: u32,
        pixel_thresholds: &PixelThresholds,
        coverage_thresholds: &CoverageThresholds,
    ) -> Self {
        let mostly_clear = coverage_thresholds.mostly_clear;
        let mostly_cloudy = coverage_thresholds.mostly_cloudy;
        let partly_cloudy = coverage_thresholds.partly_cloudy;

        let assessments = DecisionTable::new(CoverageAssessment::Mixed)
            .rule(
                move |c: &Coverage| c.blue > mostly_clear,
                CoverageAssessment::MostlyClear,
            )
            .rule(
                move |c: &Coverage| c.gray > mostly_cloudy,
                CoverageAssessment::MostlyCloudy,
            )
            .rule(
                move |c: &Coverage| c.white > partly_cloudy,
                CoverageAssessment::PartlyCloudy,
            );

        Self {
            // A zero stride would never advance.
            sample_rate: sample_rate.max(1),
            classifier: PixelClassifier::new(pixel_thresholds),
            assessments,
        }
    }

    pub fn count_pixels(&self, image: &RgbImage) -> PixelCounts {
        let (width, height) = image.dimensions();
        let step = self.sample_rate as usize;
        let mut counts = PixelCounts::default();

        for y in (0..height).step_by(step) {
            for x in (0..width).step_by(step) {
                let [r, g, b] = image.get_pixel(x, y).0;
                counts.record(self.classifier.classify(r, g, b));
            }
        }

        counts
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl SkyAnalyzer for SkyFeatureAnalyzer {
    type Output = FeatureResult;

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn analyze(&self, image: &RgbImage) -> FeatureResult {
        let counts = self.count_pixels(image);
        let coverage = counts.coverage();
        let assessment = self.assessments.evaluate(&coverage);

        debug!(
            "Sampled {} pixels every {}px: blue {:.1}%, gray {:.1}%, white {:.1}% -> {:?}",
            counts.total, self.sample_rate, coverage.blue, coverage.gray, coverage.white, assessment
        );

        FeatureResult {
            blue_coverage: round_to(coverage.blue, 1),
            gray_coverage: round_to(coverage.gray, 1),
            white_coverage: round_to(coverage.white, 1),
            assessment,
            pixels_sampled: counts.total,
        }
    }

    fn name(&self) -> &'static str {
        "SkyFeatureAnalyzer"
    }
}

impl Default for SkyFeatureAnalyzer {
    fn default() -> Self {
        Self::new(50, &PixelThresholds::default(), &CoverageThresholds::default())
    }
}
