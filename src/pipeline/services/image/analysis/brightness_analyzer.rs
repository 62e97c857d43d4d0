use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::BrightnessThresholds;
use super::core::{round_to, scaled_score, DecisionTable, SkyAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrightnessCondition {
    VeryBright,
    Bright,
    Moderate,
    Dim,
    Dark,
}

impl BrightnessCondition {
    pub fn label(&self) -> &'static str {
        match self {
            BrightnessCondition::VeryBright => "Very bright - clear/sunny",
            BrightnessCondition::Bright => "Bright - partly cloudy",
            BrightnessCondition::Moderate => "Moderate - cloudy",
            BrightnessCondition::Dim => "Dim - overcast",
            BrightnessCondition::Dark => "Dark - night/storm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightnessResult {
    pub average: f64,
    pub condition: BrightnessCondition,
    pub score: u8,
}

/// Mean luminance over every pixel, mapped to a condition and 0-100 score
pub struct BrightnessAnalyzer {
    conditions: DecisionTable<f64, BrightnessCondition>,
}

impl BrightnessAnalyzer {
    pub fn new(thresholds: &BrightnessThresholds) -> Self {
        let BrightnessThresholds {
            very_bright,
            bright,
            moderate,
            dim,
        } = *thresholds;

        let conditions = DecisionTable::new(BrightnessCondition::Dark)
            .rule(move |v: &f64| *v > very_bright, BrightnessCondition::VeryBright)
            .rule(move |v: &f64| *v > bright, BrightnessCondition::Bright)
            .rule(move |v: &f64| *v > moderate, BrightnessCondition::Moderate)
            .rule(move |v: &f64| *v > dim, BrightnessCondition::Dim);

        Self { conditions }
    }

    fn mean_luma(image: &RgbImage) -> f64 {
        let count = u64::from(image.width()) * u64::from(image.height());
        if count == 0 {
            return 0.0;
        }

        let sum: u64 = image
            .pixels()
            .map(|p| u64::from(luma(p[0], p[1], p[2])))
            .sum();
        sum as f64 / count as f64
    }
}

impl SkyAnalyzer for BrightnessAnalyzer {
    type Output = BrightnessResult;

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn analyze(&self, image: &RgbImage) -> BrightnessResult {
        let average = Self::mean_luma(image);
        let condition = self.conditions.evaluate(&average);
        let score = scaled_score(average, 100.0);

        debug!("Mean brightness {:.2}: {:?} (score {})", average, condition, score);

        BrightnessResult {
            average: round_to(average, 2),
            condition,
            score,
        }
    }

    fn name(&self) -> &'static str {
        "BrightnessAnalyzer"
    }
}

impl Default for BrightnessAnalyzer {
    fn default() -> Self {
        Self::new(&BrightnessThresholds::default())
    }
}

/// BT.601 luma quantized to 8 bits, in 14-bit fixed point with rounding.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R_WEIGHT: u32 = 4899; // 0.299
    const G_WEIGHT: u32 = 9617; // 0.587
    const B_WEIGHT: u32 = 1868; // 0.114
    const SHIFT: u32 = 14;

    let weighted =
        u32::from(r) * R_WEIGHT + u32::from(g) * G_WEIGHT + u32::from(b) * B_WEIGHT;
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(width, height, Rgb(rgb))
    }

    #[test]
    fn all_black_image_is_dark() {
        let result = BrightnessAnalyzer::default().analyze(&uniform(32, 24, [0, 0, 0]));
        assert_eq!(result.average, 0.0);
        assert_eq!(result.condition, BrightnessCondition::Dark);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn all_white_image_is_very_bright() {
        let result = BrightnessAnalyzer::default().analyze(&uniform(32, 24, [255, 255, 255]));
        assert_eq!(result.average, 255.0);
        assert_eq!(result.condition, BrightnessCondition::VeryBright);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn uses_luminance_weights_not_channel_average() {
        // Channel average would be 85; luma weights green heavily.
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 0, 255), 29);

        let result = BrightnessAnalyzer::default().analyze(&uniform(4, 4, [0, 255, 0]));
        assert_eq!(result.average, 150.0);
        assert_eq!(result.condition, BrightnessCondition::Bright);
        assert_eq!(result.score, 58);
    }

    #[test]
    fn thresholds_are_strict() {
        let analyzer = BrightnessAnalyzer::default();
        assert_eq!(
            analyzer.analyze(&uniform(2, 2, [180, 180, 180])).condition,
            BrightnessCondition::Bright
        );
        assert_eq!(
            analyzer.analyze(&uniform(2, 2, [181, 181, 181])).condition,
            BrightnessCondition::VeryBright
        );
        assert_eq!(
            analyzer.analyze(&uniform(2, 2, [60, 60, 60])).condition,
            BrightnessCondition::Dark
        );
        assert_eq!(
            analyzer.analyze(&uniform(2, 2, [61, 61, 61])).condition,
            BrightnessCondition::Dim
        );
    }

    #[test]
    fn averages_every_pixel() {
        let mut image = uniform(2, 1, [0, 0, 0]);
        image.put_pixel(1, 0, Rgb([255, 255, 255]));
        let result = BrightnessAnalyzer::default().analyze(&image);
        assert_eq!(result.average, 127.5);
        assert_eq!(result.condition, BrightnessCondition::Moderate);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn half_hundredth_average_rounds_to_even() {
        // (7 * 127 + 128) / 8 = 127.125
        let mut image = uniform(8, 1, [127, 127, 127]);
        image.put_pixel(7, 0, Rgb([128, 128, 128]));
        let result = BrightnessAnalyzer::default().analyze(&image);
        assert_eq!(result.average, 127.12);
        assert_eq!(result.score, 49);
    }

    #[test]
    fn zero_area_image_yields_zero_average() {
        let result = BrightnessAnalyzer::default().analyze(&RgbImage::new(0, 0));
        assert_eq!(result.average, 0.0);
        assert_eq!(result.condition, BrightnessCondition::Dark);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn custom_thresholds() {
        let thresholds = BrightnessThresholds {
            very_bright: 250.0,
            ..BrightnessThresholds::default()
        };
        let result = BrightnessAnalyzer::new(&thresholds).analyze(&uniform(2, 2, [200, 200, 200]));
        assert_eq!(result.condition, BrightnessCondition::Bright);
    }
}
