use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbImage};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::FrameError;

/// One decoded camera capture
#[derive(Clone)]
pub struct Frame {
    camera_id: Uuid,
    image: Arc<RgbImage>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn new(
        camera_id: Uuid,
        image: RgbImage,
        captured_at: DateTime<Utc>,
        frame_id: Uuid,
    ) -> Self {
        Self {
            camera_id,
            image: Arc::new(image),
            captured_at,
            frame_id,
        }
    }

    /// Decode a JPEG body as received from the camera.
    pub fn from_jpeg(bytes: &[u8], camera_id: Uuid, max_bytes: usize) -> Result<Self, FrameError> {
        if bytes.is_empty() {
            return Err(FrameError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(FrameError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?.to_rgb8();
        Ok(Self::new(camera_id, image, Utc::now(), Uuid::new_v4()))
    }

    pub fn get_camera_id(&self) -> Uuid {
        self.camera_id
    }

    pub fn get_frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn image(&self) -> &Arc<RgbImage> {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
pub(crate) fn encode_jpeg(image: &RgbImage) -> Vec<u8> {
    use image::codecs::jpeg::JpegEncoder;

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 95)
        .encode_image(image)
        .unwrap();
    bytes
}
