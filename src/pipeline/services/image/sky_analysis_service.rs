use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceBuilder};
use tracing::{error, info};

use super::analysis::SkyAnalysisOrchestrator;
use crate::common::Frame;
use crate::error::AppError;
use crate::pipeline::types::AnalyzedFrame;

/// Runs sky analysis for each frame on the blocking thread pool so the
/// CPU-bound pixel work never stalls the async runtime.
#[derive(Clone)]
pub struct SkyAnalysisService {
    orchestrator: Arc<SkyAnalysisOrchestrator>,
}

impl SkyAnalysisService {
    pub fn new(orchestrator: SkyAnalysisOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

impl Service<Frame> for SkyAnalysisService {
    type Response = AnalyzedFrame;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, frame: Frame) -> Self::Future {
        let orchestrator = Arc::clone(&self.orchestrator);

        Box::pin(async move {
            let start = Instant::now();
            let image = Arc::clone(frame.image());

            let analysis = tokio::task::spawn_blocking(move || orchestrator.analyze(&image))
                .await
                .map_err(|e| {
                    error!("Sky analysis worker failed: {}", e);
                    AppError::Worker(e.to_string())
                })?;

            let processing_time = start.elapsed();
            info!(
                "Frame {} analyzed in {}us: {:?}",
                frame.get_frame_id(),
                processing_time.as_micros(),
                analysis.sky_condition
            );

            Ok(AnalyzedFrame::new(frame, analysis, processing_time))
        })
    }
}

pub struct SkyAnalysisServiceBuilder {
    orchestrator: SkyAnalysisOrchestrator,
    analysis_timeout: Option<Duration>,
}

impl SkyAnalysisServiceBuilder {
    pub fn new(orchestrator: SkyAnalysisOrchestrator) -> Self {
        Self {
            orchestrator,
            analysis_timeout: None,
        }
    }

    pub fn analysis_timeout(mut self, analysis_timeout: Duration) -> Self {
        self.analysis_timeout = Some(analysis_timeout);
        self
    }

    pub fn build(self) -> BoxService<Frame, AnalyzedFrame, AppError> {
        let service = SkyAnalysisService::new(self.orchestrator);

        match self.analysis_timeout {
            Some(timeout) => BoxService::new(
                ServiceBuilder::new()
                    .map_err(timeout_error)
                    .layer(TimeoutLayer::new(timeout))
                    .service(service),
            ),
            None => BoxService::new(service),
        }
    }
}

fn timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        return AppError::Timeout;
    }

    match err.downcast::<AppError>() {
        Ok(app_error) => *app_error,
        Err(other) => AppError::Worker(other.to_string()),
    }
}
