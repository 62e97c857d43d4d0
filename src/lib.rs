pub mod common;
pub mod config;
pub mod error;
pub mod pipeline;

pub use common::Frame;
pub use self::config::Settings;
pub use error::{AppError, FrameError};
pub use pipeline::services::image::analysis::{
    AnalysisConfig, AnalysisRecord, EnabledAnalyzers, SkyAnalysisOrchestrator,
};
pub use pipeline::{AnalyzedFrame, FrameReport, SkyAnalysisService, SkyAnalysisServiceBuilder};
