use crate::analysis::AnalysisOutcome;
use crate::capture::{CapturedImage, StreamHandle};
use crate::error::{AppError, CameraError, CaptureError};
use crate::input::CaptureSource;
use tokio::sync::oneshot;

/// Commands for the Camera service
pub enum CameraCommand {
    Start(oneshot::Sender<Result<StreamHandle, CameraError>>),
    Stop(oneshot::Sender<bool>),
    Capture(StreamHandle, oneshot::Sender<Result<CapturedImage, CaptureError>>),
}

/// Analysis state (observable via watch channel)
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Ready(CaptureSource),
    Analyzing(CaptureSource),
    Succeeded(AnalysisOutcome),
    Failed(AppError),
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing(_))
    }
}

/// Result of one pipeline run, tagged with the run that produced it
#[derive(Debug)]
pub struct PipelineCompletion {
    pub generation: u64,
    pub outcome: Result<AnalysisOutcome, AppError>,
}
