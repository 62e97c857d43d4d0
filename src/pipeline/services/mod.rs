pub mod image;

pub use self::image::{SkyAnalysisService, SkyAnalysisServiceBuilder};
