use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    InvalidConfig(String),
    #[error("Frame Error: {0}")]
    Frame(#[from] FrameError),
    #[error("Analysis worker failed: {0}")]
    Worker(String),
    #[error("Analysis timed out")]
    Timeout,
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

// Frame Ingest Error Type
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No image data received")]
    Empty,
    #[error("Image too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
