mod analyzed_frame;

pub use analyzed_frame::{AnalyzedFrame, FrameReport};
