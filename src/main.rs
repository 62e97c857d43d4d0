use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clearsky::{
    AnalyzedFrame, AppError, Frame, Settings, SkyAnalysisOrchestrator, SkyAnalysisServiceBuilder,
};
use tower::util::BoxService;
use tower::{Service, ServiceExt};
use tracing::{error, info, Level};
use uuid::Uuid;

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Score how clear the sky is in one or more JPEG frames
#[derive(Parser, Debug)]
#[command(name = "clearsky", version)]
struct Args {
    /// Settings file (defaults to ./clearsky.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JPEG images to analyze, in order
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

async fn analyze_file(
    service: &mut BoxService<Frame, AnalyzedFrame, AppError>,
    path: &Path,
    camera_id: Uuid,
    max_bytes: usize,
) -> Result<AnalyzedFrame, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let frame = Frame::from_jpeg(&bytes, camera_id, max_bytes)?;
    service.ready().await?.call(frame).await
}

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    init_logging(settings.log_level()?);

    let orchestrator = SkyAnalysisOrchestrator::new(settings.analysis.clone())?;
    let mut builder = SkyAnalysisServiceBuilder::new(orchestrator);
    if let Some(timeout) = settings.analysis_timeout() {
        builder = builder.analysis_timeout(timeout);
    }
    let mut service = builder.build();

    let camera_id = Uuid::new_v4();
    let max_bytes = settings.max_image_bytes();
    let mut failures = 0usize;

    for path in &args.images {
        match analyze_file(&mut service, path, camera_id, max_bytes).await {
            Ok(analyzed) => {
                info!("Analyzed {}", path.display());
                println!("{}\n{}", path.display(), analyzed.analysis);
                match serde_json::to_string_pretty(&analyzed.report()) {
                    Ok(json) => println!("{json}\n"),
                    Err(e) => error!("Failed to serialize report for {}: {}", path.display(), e),
                }
            }
            Err(e) => {
                error!("Failed to analyze {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{} of {} images failed", failures, args.images.len());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_config_and_images() {
        let args = Args::try_parse_from(["clearsky", "-c", "sky.toml", "a.jpg", "b.jpg"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("sky.toml")));
        assert_eq!(args.images, vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);

        let args = Args::try_parse_from(["clearsky", "--config", "sky.toml", "a.jpg"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("sky.toml")));
    }

    #[test]
    fn config_is_optional() {
        let args = Args::try_parse_from(["clearsky", "a.jpg"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.images.len(), 1);
    }

    #[test]
    fn images_are_required() {
        let err = Args::try_parse_from(["clearsky"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["clearsky", "--config", "sky.toml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn config_flag_needs_a_value() {
        let err = Args::try_parse_from(["clearsky", "--config"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn help_is_reported_not_exited() {
        let err = Args::try_parse_from(["clearsky", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
