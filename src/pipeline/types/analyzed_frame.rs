use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::common::Frame;
use crate::pipeline::services::image::analysis::AnalysisRecord;

#[derive(Clone)]
pub struct AnalyzedFrame {
    pub frame: Frame,
    pub analysis: AnalysisRecord,
    pub processing_time: Duration,
}

/// Serializable view handed to persistence and API collaborators
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame_id: Uuid,
    pub camera_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub image_width: u32,
    pub image_height: u32,
    pub processing_time_us: u64,
    pub analysis: AnalysisRecord,
}

impl AnalyzedFrame {
    pub fn new(frame: Frame, analysis: AnalysisRecord, processing_time: Duration) -> Self {
        Self {
            frame,
            analysis,
            processing_time,
        }
    }

    pub fn report(&self) -> FrameReport {
        let (image_width, image_height) = self.frame.dimensions();
        FrameReport {
            frame_id: self.frame.get_frame_id(),
            camera_id: self.frame.get_camera_id(),
            timestamp: self.frame.captured_at(),
            image_width,
            image_height,
            processing_time_us: self.processing_time.as_micros() as u64,
            analysis: self.analysis.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    #[test]
    fn report_carries_frame_identity_and_analysis() {
        let image: RgbImage = ImageBuffer::from_pixel(8, 6, Rgb([0, 0, 0]));
        let frame = Frame::new(Uuid::new_v4(), image, Utc::now(), Uuid::new_v4());
        let analyzed = AnalyzedFrame::new(
            frame.clone(),
            AnalysisRecord {
                clear_sky_score: Some(12),
                ..AnalysisRecord::default()
            },
            Duration::from_micros(250),
        );

        let json = serde_json::to_value(analyzed.report()).unwrap();
        assert_eq!(json["frame_id"], frame.get_frame_id().to_string());
        assert_eq!(json["image_width"], 8);
        assert_eq!(json["image_height"], 6);
        assert_eq!(json["processing_time_us"], 250);
        assert_eq!(json["analysis"]["clear_sky_score"], 12);
        assert!(json["analysis"].get("brightness").is_none());
    }
}
