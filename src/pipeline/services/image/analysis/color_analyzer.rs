use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::ColorThresholds;
use super::core::{channel_variance, round_to, scaled_score, DecisionTable, SkyAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkyCondition {
    ClearBlueSky,
    BrightOvercast,
    Cloudy,
    DarkClouds,
    Night,
    Mixed,
}

impl SkyCondition {
    pub fn label(&self) -> &'static str {
        match self {
            SkyCondition::ClearBlueSky => "Clear blue sky",
            SkyCondition::BrightOvercast => "Bright overcast",
            SkyCondition::Cloudy => "Cloudy",
            SkyCondition::DarkClouds => "Dark clouds",
            SkyCondition::Night => "Night",
            SkyCondition::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorResult {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub brightness: f64,
    pub color_variance: f64,
    pub blue_dominant: bool,
    pub is_gray: bool,
    pub condition: SkyCondition,
    pub blue_sky_score: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorSignals {
    pub blue_dominant: bool,
    pub is_gray: bool,
    pub brightness: f64,
}

/// How a matched condition turns brightness into a blue-sky score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlueSkyScore {
    /// `floor(brightness / 255 * scale)`
    Scaled(f64),
    Fixed(u8),
}

impl BlueSkyScore {
    fn apply(self, brightness: f64) -> u8 {
        match self {
            BlueSkyScore::Scaled(scale) => scaled_score(brightness, scale),
            BlueSkyScore::Fixed(score) => score.min(100),
        }
    }
}

/// Whole-image mean color, blue dominance and grayness
pub struct ColorAnalyzer {
    blue_red_diff: f64,
    blue_green_diff: f64,
    gray_variance_max: f64,
    conditions: DecisionTable<ColorSignals, (SkyCondition, BlueSkyScore)>,
}

impl ColorAnalyzer {
    pub fn new(thresholds: &ColorThresholds) -> Self {
        let clear = thresholds.clear_sky_min_brightness;
        let bright_overcast = thresholds.bright_overcast_min_brightness;
        let cloudy = thresholds.cloudy_min_brightness;
        let dark_clouds = thresholds.dark_clouds_min_brightness;
        let night = thresholds.night_max_brightness;
        let dark_clouds_score = thresholds.dark_clouds_score;

        let conditions = DecisionTable::new((SkyCondition::Mixed, BlueSkyScore::Scaled(40.0)))
            .rule(
                move |s: &ColorSignals| s.blue_dominant && s.brightness > clear,
                (SkyCondition::ClearBlueSky, BlueSkyScore::Scaled(100.0)),
            )
            .rule(
                move |s: &ColorSignals| s.is_gray && s.brightness > bright_overcast,
                (SkyCondition::BrightOvercast, BlueSkyScore::Scaled(50.0)),
            )
            .rule(
                move |s: &ColorSignals| s.is_gray && s.brightness > cloudy,
                (SkyCondition::Cloudy, BlueSkyScore::Scaled(30.0)),
            )
            .rule(
                move |s: &ColorSignals| s.is_gray && s.brightness > dark_clouds,
                (SkyCondition::DarkClouds, BlueSkyScore::Fixed(dark_clouds_score)),
            )
            .rule(
                move |s: &ColorSignals| s.brightness < night,
                (SkyCondition::Night, BlueSkyScore::Fixed(0)),
            );

        Self {
            blue_red_diff: thresholds.blue_red_diff,
            blue_green_diff: thresholds.blue_green_diff,
            gray_variance_max: thresholds.gray_variance_max,
            conditions,
        }
    }

    fn mean_rgb(image: &RgbImage) -> (f64, f64, f64) {
        let count = u64::from(image.width()) * u64::from(image.height());
        if count == 0 {
            return (0.0, 0.0, 0.0);
        }

        let (r, g, b) = image.pixels().fold((0u64, 0u64, 0u64), |(r, g, b), p| {
            (
                r + u64::from(p[0]),
                g + u64::from(p[1]),
                b + u64::from(p[2]),
            )
        });
        let n = count as f64;
        (r as f64 / n, g as f64 / n, b as f64 / n)
    }

    pub fn is_blue_dominant(&self, r: f64, g: f64, b: f64) -> bool {
        b > r + self.blue_red_diff && b > g + self.blue_green_diff
    }
}

impl SkyAnalyzer for ColorAnalyzer {
    type Output = ColorResult;

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn analyze(&self, image: &RgbImage) -> ColorResult {
        let (red, green, blue) = Self::mean_rgb(image);
        let brightness = (red + green + blue) / 3.0;
        let color_variance = channel_variance(red, green, blue);

        let signals = ColorSignals {
            blue_dominant: self.is_blue_dominant(red, green, blue),
            is_gray: color_variance < self.gray_variance_max,
            brightness,
        };
        let (condition, score_rule) = self.conditions.evaluate(&signals);
        let blue_sky_score = score_rule.apply(brightness);

        debug!(
            "Mean color R={:.1} G={:.1} B={:.1}: {:?} (blue sky score {})",
            red, green, blue, condition, blue_sky_score
        );

        ColorResult {
            red: round_to(red, 2),
            green: round_to(green, 2),
            blue: round_to(blue, 2),
            brightness: round_to(brightness, 2),
            color_variance: round_to(color_variance, 2),
            blue_dominant: signals.blue_dominant,
            is_gray: signals.is_gray,
            condition,
            blue_sky_score,
        }
    }

    fn name(&self) -> &'static str {
        "ColorAnalyzer"
    }
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self::new(&ColorThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn uniform(rgb: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(16, 12, Rgb(rgb))
    }

    #[test]
    fn blue_image_is_clear_sky() {
        let result = ColorAnalyzer::default().analyze(&uniform([50, 50, 220]));

        assert!(result.blue_dominant);
        assert!(!result.is_gray);
        assert_eq!(result.condition, SkyCondition::ClearBlueSky);
        // brightness = 320 / 3 = 106.67
        assert_eq!(result.brightness, 106.67);
        assert_eq!(result.blue_sky_score, 41);
    }

    #[test]
    fn clear_sky_needs_brightness_strictly_above_100() {
        // brightness == 100 exactly
        let result = ColorAnalyzer::default().analyze(&uniform([50, 50, 200]));
        assert!(result.blue_dominant);
        assert_eq!(result.brightness, 100.0);
        assert_ne!(result.condition, SkyCondition::ClearBlueSky);
        assert_eq!(result.condition, SkyCondition::Mixed);
        assert_eq!(result.blue_sky_score, 15);
    }

    #[test]
    fn gray_images_by_brightness() {
        let analyzer = ColorAnalyzer::default();

        let bright = analyzer.analyze(&uniform([200, 200, 200]));
        assert!(bright.is_gray);
        assert_eq!(bright.condition, SkyCondition::BrightOvercast);
        assert_eq!(bright.blue_sky_score, 39);

        let cloudy = analyzer.analyze(&uniform([120, 120, 120]));
        assert_eq!(cloudy.condition, SkyCondition::Cloudy);
        assert_eq!(cloudy.blue_sky_score, 14);

        let dark = analyzer.analyze(&uniform([70, 70, 70]));
        assert_eq!(dark.condition, SkyCondition::DarkClouds);
        assert_eq!(dark.blue_sky_score, 10);

        let night = analyzer.analyze(&uniform([20, 20, 20]));
        assert_eq!(night.condition, SkyCondition::Night);
        assert_eq!(night.blue_sky_score, 0);
    }

    #[test]
    fn gray_at_exactly_fifty_is_mixed() {
        // Neither dark clouds (> 50) nor night (< 50).
        let result = ColorAnalyzer::default().analyze(&uniform([50, 50, 50]));
        assert_eq!(result.condition, SkyCondition::Mixed);
        assert_eq!(result.blue_sky_score, 7);
    }

    #[test]
    fn colorful_image_is_mixed() {
        let result = ColorAnalyzer::default().analyze(&uniform([200, 120, 60]));
        assert!(!result.is_gray);
        assert!(!result.blue_dominant);
        assert_eq!(result.condition, SkyCondition::Mixed);
        assert_eq!(result.color_variance, 280.0);
    }

    #[test]
    fn image_level_blue_dominance_is_looser_than_pixel_level() {
        let analyzer = ColorAnalyzer::default();
        assert!(analyzer.is_blue_dominant(100.0, 110.0, 121.0));
        assert!(!analyzer.is_blue_dominant(100.0, 111.0, 121.0));
    }

    #[test]
    fn zero_area_image_yields_zeroed_fields() {
        let result = ColorAnalyzer::default().analyze(&RgbImage::new(0, 0));
        assert_eq!((result.red, result.green, result.blue), (0.0, 0.0, 0.0));
        assert_eq!(result.brightness, 0.0);
        assert_eq!(result.condition, SkyCondition::Night);
        assert_eq!(result.blue_sky_score, 0);
    }

    #[test]
    fn condition_serializes_in_screaming_snake_case() {
        let json = serde_json::to_string(&SkyCondition::ClearBlueSky).unwrap();
        assert_eq!(json, "\"CLEAR_BLUE_SKY\"");
    }
}
