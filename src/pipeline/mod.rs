pub mod services;
pub mod types;

pub use services::{SkyAnalysisService, SkyAnalysisServiceBuilder};
pub use types::{AnalyzedFrame, FrameReport};
