use serde::{Deserialize, Serialize};

/// Configuration for sky analysis with tunable thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enabled_analyzers: EnabledAnalyzers,
    pub brightness: BrightnessThresholds,
    pub color: ColorThresholds,
    pub pixel: PixelThresholds,
    pub coverage: CoverageThresholds,
    pub blending: ScoreBlending,
    /// Grid stride for the feature analyzer, in pixels.
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    Brightness,
    Color,
    Features,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledAnalyzers {
    pub brightness: bool,
    pub color: bool,
    pub features: bool,
}

/// Lower bounds (exclusive) of each brightness condition, on the 0-255 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessThresholds {
    pub very_bright: f64,
    pub bright: f64,
    pub moderate: f64,
    pub dim: f64,
}

/// Whole-image color rules. Looser than the per-pixel blue rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorThresholds {
    pub blue_red_diff: f64,
    pub blue_green_diff: f64,
    pub gray_variance_max: f64,
    pub clear_sky_min_brightness: f64,
    pub bright_overcast_min_brightness: f64,
    pub cloudy_min_brightness: f64,
    pub dark_clouds_min_brightness: f64,
    pub night_max_brightness: f64,
    pub dark_clouds_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelThresholds {
    pub blue_min: u16,
    pub blue_red_diff: u16,
    pub blue_green_diff: u16,
    pub white_brightness_min: u16,
    pub white_variance_max: u16,
    pub gray_variance_max: u16,
}

/// Coverage percentages (0-100) that decide the overall assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageThresholds {
    pub mostly_clear: f64,
    pub mostly_cloudy: f64,
    pub partly_cloudy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBlending {
    pub blue_coverage_boost_above: f64,
    pub blue_coverage_boost: f64,
    pub gray_coverage_penalty_above: f64,
    pub gray_coverage_penalty: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled_analyzers: EnabledAnalyzers::default(),
            brightness: BrightnessThresholds::default(),
            color: ColorThresholds::default(),
            pixel: PixelThresholds::default(),
            coverage: CoverageThresholds::default(),
            blending: ScoreBlending::default(),
            sample_rate: 50,
        }
    }
}

impl Default for EnabledAnalyzers {
    fn default() -> Self {
        Self {
            brightness: true,
            color: true,
            features: true,
        }
    }
}

impl Default for BrightnessThresholds {
    fn default() -> Self {
        Self {
            very_bright: 180.0, // Clear/sunny
            bright: 140.0,      // Partly cloudy
            moderate: 100.0,    // Cloudy
            dim: 60.0,          // Overcast
        }
    }
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            blue_red_diff: 20.0,
            blue_green_diff: 10.0,
            gray_variance_max: 30.0,
            clear_sky_min_brightness: 100.0,
            bright_overcast_min_brightness: 150.0,
            cloudy_min_brightness: 100.0,
            dark_clouds_min_brightness: 50.0,
            night_max_brightness: 50.0,
            dark_clouds_score: 10,
        }
    }
}

impl Default for PixelThresholds {
    fn default() -> Self {
        Self {
            blue_min: 150,
            blue_red_diff: 30,
            blue_green_diff: 20,
            white_brightness_min: 200,
            white_variance_max: 40,
            gray_variance_max: 30,
        }
    }
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            mostly_clear: 60.0,
            mostly_cloudy: 60.0,
            partly_cloudy: 40.0,
        }
    }
}

impl Default for ScoreBlending {
    fn default() -> Self {
        Self {
            blue_coverage_boost_above: 60.0,
            blue_coverage_boost: 1.1,
            gray_coverage_penalty_above: 60.0,
            gray_coverage_penalty: 0.8,
        }
    }
}

impl EnabledAnalyzers {
    pub fn only(kind: AnalyzerKind) -> Self {
        Self::none().with(kind)
    }

    pub fn none() -> Self {
        Self {
            brightness: false,
            color: false,
            features: false,
        }
    }

    pub fn with(mut self, kind: AnalyzerKind) -> Self {
        self.set(kind, true);
        self
    }

    pub fn is_enabled(&self, kind: AnalyzerKind) -> bool {
        match kind {
            AnalyzerKind::Brightness => self.brightness,
            AnalyzerKind::Color => self.color,
            AnalyzerKind::Features => self.features,
        }
    }

    fn set(&mut self, kind: AnalyzerKind, enabled: bool) {
        match kind {
            AnalyzerKind::Brightness => self.brightness = enabled,
            AnalyzerKind::Color => self.color = enabled,
            AnalyzerKind::Features => self.features = enabled,
        }
    }
}

impl AnalysisConfig {
    /// Lightweight profile: no grid sampling, coarser stride if re-enabled
    pub fn fast() -> Self {
        Self {
            enabled_analyzers: EnabledAnalyzers {
                brightness: true,
                color: true,
                features: false,
            },
            sample_rate: 100,
            ..Self::default()
        }
    }

    /// Denser feature grid for more accurate coverage numbers
    pub fn detailed() -> Self {
        Self {
            sample_rate: 25,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("Sample rate must be at least 1".to_string());
        }

        let b = &self.brightness;
        let ascending = 0.0 <= b.dim
            && b.dim < b.moderate
            && b.moderate < b.bright
            && b.bright < b.very_bright
            && b.very_bright <= 255.0;
        if !ascending {
            return Err("Brightness thresholds must be in ascending order (0-255)".to_string());
        }

        let c = &self.coverage;
        for (name, value) in [
            ("mostly_clear", c.mostly_clear),
            ("mostly_cloudy", c.mostly_cloudy),
            ("partly_cloudy", c.partly_cloudy),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("Coverage threshold {name} must be between 0 and 100"));
            }
        }

        if self.blending.blue_coverage_boost < 0.0 || self.blending.gray_coverage_penalty < 0.0 {
            return Err("Score blending factors must not be negative".to_string());
        }

        if self.color.dark_clouds_score > 100 {
            return Err("Dark clouds score must be between 0 and 100".to_string());
        }

        Ok(())
    }

    /// Enable a specific analyzer
    pub fn with_analyzer(mut self, kind: AnalyzerKind) -> Self {
        self.enabled_analyzers.set(kind, true);
        self
    }

    /// Disable a specific analyzer
    pub fn without_analyzer(mut self, kind: AnalyzerKind) -> Self {
        self.enabled_analyzers.set(kind, false);
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert!(AnalysisConfig::fast().validate().is_ok());
        assert!(AnalysisConfig::detailed().validate().is_ok());
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let config = AnalysisConfig::default().with_sample_rate(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unordered_brightness_thresholds_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.brightness.bright = 190.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toggling_analyzers() {
        let config = AnalysisConfig::default().without_analyzer(AnalyzerKind::Color);
        assert!(!config.enabled_analyzers.is_enabled(AnalyzerKind::Color));
        assert!(config.enabled_analyzers.is_enabled(AnalyzerKind::Brightness));

        let config = config.with_analyzer(AnalyzerKind::Color);
        assert!(config.enabled_analyzers.color);

        let only = EnabledAnalyzers::only(AnalyzerKind::Features);
        assert!(only.features && !only.brightness && !only.color);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"sample_rate": 10, "pixel": {"blue_min": 120}}"#).unwrap();
        assert_eq!(config.sample_rate, 10);
        assert_eq!(config.pixel.blue_min, 120);
        assert_eq!(config.pixel.blue_red_diff, 30);
        assert_eq!(config.brightness, BrightnessThresholds::default());
    }
}
