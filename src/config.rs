use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;
use crate::pipeline::services::image::analysis::AnalysisConfig;

pub const DEFAULT_CONFIG_FILE: &str = "clearsky";
const ENV_PREFIX: &str = "CLEARSKY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisConfig,
    pub ingest: IngestSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub max_image_size_mb: u64,
    pub analysis_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_image_size_mb: 10,
            analysis_timeout_ms: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Layered load: optional config file, then `CLEARSKY__SECTION__KEY`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.ingest.max_image_size_mb < 1 {
            return Err(AppError::InvalidConfig(
                "max_image_size_mb must be at least 1".to_string(),
            ));
        }

        self.log_level()?;

        self.analysis
            .validate()
            .map_err(|e| AppError::InvalidConfig(format!("Invalid analysis config: {}", e)))
    }

    pub fn max_image_bytes(&self) -> usize {
        (self.ingest.max_image_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.ingest.analysis_timeout_ms.map(Duration::from_millis)
    }

    pub fn log_level(&self) -> Result<Level, AppError> {
        self.logging
            .level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidConfig(format!("Unknown log level: {}", self.logging.level)))
    }
}
