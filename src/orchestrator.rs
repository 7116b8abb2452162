use crate::analysis::AnalysisPipeline;
use crate::capture::{CapturedImage, StreamHandle};
use crate::error::{AppError, CaptureError};
use crate::input::{CaptureSource, InputSelector};
use crate::language::Language;
use crate::messages::{AnalysisState, PipelineCompletion};
use crate::services::CameraHandle;
use tokio::sync::{mpsc, watch};

/// Capture/analysis workflow
///
/// Owns the input selection and the single `AnalysisState`, publishing every
/// transition on a watch channel:
///
/// ```text
/// Idle → Ready(source) → Analyzing(source) → Succeeded | Failed
///            ↑                                    │
///            └────────── select source ───────────┘
/// ```
///
/// A pipeline run is spawned on the local task set. Its result comes back
/// through `next_completion` and is applied with `apply_completion`, so the
/// caller's event loop keeps handling input while a request is in flight.
pub struct Orchestrator {
    camera: CameraHandle,
    pipeline: AnalysisPipeline,
    selector: InputSelector,
    language: Language,
    state_tx: watch::Sender<AnalysisState>,
    generation: u64,
    done_tx: mpsc::UnboundedSender<PipelineCompletion>,
    done_rx: mpsc::UnboundedReceiver<PipelineCompletion>,
}

impl Orchestrator {
    pub fn new(camera: CameraHandle, pipeline: AnalysisPipeline, language: Language) -> Self {
        let (state_tx, _) = watch::channel(AnalysisState::Idle);
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        Self {
            camera,
            pipeline,
            selector: InputSelector::new(),
            language,
            state_tx,
            generation: 0,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state_tx.subscribe()
    }

    pub fn current_source(&self) -> &CaptureSource {
        self.selector.current_source()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn is_analyzing(&self) -> bool {
        self.state_tx.borrow().is_analyzing()
    }

    fn publish(&self, state: AnalysisState) {
        tracing::debug!("Analysis state -> {:?}", state);
        self.state_tx.send_replace(state);
    }

    /// After a source change, move to `Ready` unless a run is in flight.
    fn enter_ready(&self) {
        if self.is_analyzing() {
            tracing::debug!("Source changed during analysis; result will still be applied");
            return;
        }
        self.publish(AnalysisState::Ready(self.selector.current_source().clone()));
    }

    /// Select an uploaded image, stopping the camera if it was running.
    pub async fn select_file(&mut self, bytes: Vec<u8>, mime: &str) -> Result<(), AppError> {
        let previous = self.selector.select_file(bytes, mime)?;
        tracing::info!("Image selected ({})", mime);

        if let CaptureSource::CameraStream(_) = previous {
            tracing::info!("File selected, stopping camera");
            self.camera.stop().await;
        }

        self.enter_ready();
        Ok(())
    }

    /// Start the camera, clearing any selected file.
    ///
    /// On failure the current source and state are left unchanged.
    pub async fn start_camera(&mut self) -> Result<StreamHandle, AppError> {
        let handle = self.camera.start().await?;

        if let CaptureSource::FileBlob { .. } = self.selector.select_camera(handle) {
            tracing::info!("Camera started, clearing selected file");
        }

        self.enter_ready();
        Ok(handle)
    }

    /// Stop the camera. Does nothing when it is not running.
    pub async fn stop_camera(&mut self) {
        self.camera.stop().await;

        if let CaptureSource::CameraStream(_) = self.selector.current_source() {
            self.selector.clear();
            if matches!(*self.state_tx.borrow(), AnalysisState::Ready(_)) {
                self.publish(AnalysisState::Idle);
            }
        }
    }

    /// Change the recommendation language. Ignored while analyzing.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.is_analyzing() {
            tracing::debug!("Analysis in progress, ignoring language change");
            return false;
        }
        tracing::info!("Language set to {}", language);
        self.language = language;
        true
    }

    /// Start an analysis of the current source.
    ///
    /// Ignored while a run is in flight. Fails with `NoInput` (state unchanged)
    /// when nothing is selected. Any other failure ends in `Failed`.
    pub async fn analyze(&mut self) -> Result<(), AppError> {
        if self.is_analyzing() {
            tracing::debug!("Already analyzing, ignoring analyze request");
            return Ok(());
        }

        let source = self.selector.current_source().clone();
        let image = match &source {
            CaptureSource::None => return Err(AppError::NoInput),
            CaptureSource::FileBlob { bytes, mime } => CapturedImage::Binary {
                bytes: bytes.to_vec(),
                mime: mime.clone(),
            },
            CaptureSource::CameraStream(handle) => match self.camera.capture(*handle).await {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!("Frame capture failed: {}", e);
                    if matches!(e, CaptureError::StreamEnded(_)) {
                        self.selector.clear();
                    }
                    self.publish(AnalysisState::Failed(e.into()));
                    return Ok(());
                }
            },
        };

        self.generation += 1;
        let generation = self.generation;
        self.publish(AnalysisState::Analyzing(source));

        let pipeline = self.pipeline.clone();
        let language = self.language;
        let done_tx = self.done_tx.clone();
        tokio::task::spawn_local(async move {
            let outcome = pipeline.run(image, language).await;
            let _ = done_tx.send(PipelineCompletion {
                generation,
                outcome,
            });
        });

        Ok(())
    }

    /// Wait for the next finished pipeline run.
    pub async fn next_completion(&mut self) -> Option<PipelineCompletion> {
        self.done_rx.recv().await
    }

    pub fn apply_completion(&mut self, completion: PipelineCompletion) {
        if completion.generation != self.generation || !self.is_analyzing() {
            tracing::debug!(
                "Discarding stale result of run {} (current run {})",
                completion.generation,
                self.generation
            );
            return;
        }

        match completion.outcome {
            Ok(outcome) => {
                tracing::info!("Analysis complete: {}", outcome.emotion.label);
                self.publish(AnalysisState::Succeeded(outcome));
            }
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                self.publish(AnalysisState::Failed(e));
            }
        }
    }

    /// Wait for the in-flight run, if any, and apply its result.
    pub async fn settle(&mut self) {
        while self.is_analyzing() {
            match self.next_completion().await {
                Some(completion) => self.apply_completion(completion),
                None => break,
            }
        }
    }

    /// Back to `Idle` with no source and the camera released. A run still in
    /// flight is discarded when it finishes.
    pub async fn reset(&mut self) {
        self.camera.stop().await;
        self.selector.clear();
        self.generation += 1;
        self.publish(AnalysisState::Idle);
    }

    /// Release the camera on exit. The last published state stays as it is;
    /// a run still in flight is discarded.
    pub async fn shutdown(&mut self) {
        self.camera.stop().await;
        self.generation += 1;
    }
}
