use serde::{Deserialize, Serialize};
use std::fmt;

use super::brightness_analyzer::BrightnessResult;
use super::color_analyzer::{ColorResult, SkyCondition};
use super::sky_feature_analyzer::FeatureResult;

/// Combined output of one analysis run. Parts whose analyzer was disabled
/// are `None` and left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<BrightnessResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_sky_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sky_condition: Option<SkyCondition>,
}

impl AnalysisRecord {
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none() && self.color.is_none() && self.features.is_none()
    }
}

/// Human-readable summary, one section per present part
impl fmt::Display for AnalysisRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();

        if let Some(b) = &self.brightness {
            lines.push(format!("Brightness: {:.1} ({})", b.average, b.condition.label()));
        }

        if let Some(c) = &self.color {
            lines.push(format!("Color: {}", c.condition.label()));
            lines.push(format!(
                "RGB: R={:.1}, G={:.1}, B={:.1}",
                c.red, c.green, c.blue
            ));
        }

        if let Some(ft) = &self.features {
            lines.push(format!(
                "Sky Coverage: Blue {:.1}%, Gray {:.1}%, White {:.1}%",
                ft.blue_coverage, ft.gray_coverage, ft.white_coverage
            ));
            lines.push(format!("Assessment: {}", ft.assessment.label()));
        }

        if let Some(score) = self.clear_sky_score {
            lines.push(format!("Clear Sky Score: {}%", score));
        }

        write!(f, "{}", lines.join("\n"))
    }
}
