use serde::{Deserialize, Serialize};

use super::config::PixelThresholds;
use super::core::DecisionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelType {
    Blue,
    White,
    Gray,
    Other,
}

/// Per-pixel measurements the classification rules look at
#[derive(Debug, Clone, Copy)]
pub struct PixelSample {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub brightness: f64,
    pub color_variance: i32,
}

impl PixelSample {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        Self {
            r,
            g,
            b,
            brightness: f64::from(r + g + b) / 3.0,
            color_variance: (r - g).abs() + (g - b).abs() + (b - r).abs(),
        }
    }
}

/// Classifies single pixels as blue sky, white, gray or other
pub struct PixelClassifier {
    table: DecisionTable<PixelSample, PixelType>,
}

impl PixelClassifier {
    pub fn new(thresholds: &PixelThresholds) -> Self {
        let blue_min = i32::from(thresholds.blue_min);
        let blue_red_diff = i32::from(thresholds.blue_red_diff);
        let blue_green_diff = i32::from(thresholds.blue_green_diff);
        let white_brightness_min = f64::from(thresholds.white_brightness_min);
        let white_variance_max = i32::from(thresholds.white_variance_max);
        let gray_variance_max = i32::from(thresholds.gray_variance_max);

        let table = DecisionTable::new(PixelType::Other)
            .rule(
                move |p: &PixelSample| {
                    p.b > blue_min && p.b > p.r + blue_red_diff && p.b > p.g + blue_green_diff
                },
                PixelType::Blue,
            )
            .rule(
                move |p: &PixelSample| {
                    p.brightness > white_brightness_min && p.color_variance < white_variance_max
                },
                PixelType::White,
            )
            .rule(
                move |p: &PixelSample| p.color_variance < gray_variance_max,
                PixelType::Gray,
            );

        Self { table }
    }

    pub fn classify(&self, r: u8, g: u8, b: u8) -> PixelType {
        self.table.evaluate(&PixelSample::new(r, g, b))
    }
}

impl Default for PixelClassifier {
    fn default() -> Self {
        Self::new(&PixelThresholds::default())
    }
}
