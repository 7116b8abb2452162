use crate::capture::{CameraDevice, CapturedImage, FrameEncoder, StreamHandle, VideoStream};
use crate::error::{CameraError, CaptureError};
use crate::messages::CameraCommand;
use tokio::sync::{mpsc, oneshot};

/// Owns the camera device
///
/// This service:
/// - Acquires the device on start and hands out a `StreamHandle`
/// - Releases the stream exactly once, on stop or when every handle is gone
/// - Samples and encodes frames on request, detecting streams that ended
///
/// Note: device streams are not `Send`, so this service must be spawned on a
/// LocalSet using tokio::task::spawn_local.
pub struct Camera {
    device: Box<dyn CameraDevice>,
    encoder: Box<dyn FrameEncoder>,
    cmd_rx: mpsc::Receiver<CameraCommand>,
    active: Option<ActiveStream>,
    next_id: u64,
}

struct ActiveStream {
    handle: StreamHandle,
    stream: Box<dyn VideoStream>,
}

impl Camera {
    pub fn new(
        device: Box<dyn CameraDevice>,
        encoder: Box<dyn FrameEncoder>,
        cmd_rx: mpsc::Receiver<CameraCommand>,
    ) -> Self {
        Self {
            device,
            encoder,
            cmd_rx,
            active: None,
            next_id: 1,
        }
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_command(cmd);
        }

        // Every handle dropped: page-level teardown
        if self.active.take().is_some() {
            tracing::info!("Camera released on shutdown");
        }
    }

    fn handle_command(&mut self, cmd: CameraCommand) {
        match cmd {
            CameraCommand::Start(reply) => {
                let _ = reply.send(self.start());
            }
            CameraCommand::Stop(reply) => {
                let _ = reply.send(self.stop());
            }
            CameraCommand::Capture(handle, reply) => {
                let _ = reply.send(self.capture(handle));
            }
        }
    }

    fn start(&mut self) -> Result<StreamHandle, CameraError> {
        if let Some(active) = &self.active {
            tracing::debug!("Camera already running, reusing stream {}", active.handle.id());
            return Ok(active.handle);
        }

        let stream = self.device.open().map_err(|e| {
            tracing::warn!("Failed to start camera: {}", e);
            e
        })?;

        let handle = StreamHandle::new(self.next_id);
        self.next_id += 1;
        self.active = Some(ActiveStream { handle, stream });

        tracing::info!("Camera started (stream {})", handle.id());
        Ok(handle)
    }

    fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                // Dropping the stream releases the device
                drop(active);
                tracing::info!("Camera stopped");
                true
            }
            None => {
                tracing::debug!("Camera not running, nothing to stop");
                false
            }
        }
    }

    fn capture(&mut self, handle: StreamHandle) -> Result<CapturedImage, CaptureError> {
        let active = match self.active.as_mut() {
            Some(active) if active.handle == handle => active,
            _ => return Err(CaptureError::StaleHandle),
        };

        match active.stream.read_frame() {
            Ok(frame) => self.encoder.encode(&frame),
            Err(e) => {
                if matches!(e, CaptureError::StreamEnded(_)) {
                    tracing::warn!("Camera stream {} ended externally, releasing", handle.id());
                    self.active = None;
                }
                Err(e)
            }
        }
    }
}

/// Handle for communicating with the Camera
#[derive(Clone)]
pub struct CameraHandle {
    tx: mpsc::Sender<CameraCommand>,
}

impl CameraHandle {
    pub fn new(tx: mpsc::Sender<CameraCommand>) -> Self {
        Self { tx }
    }

    /// Spawn a Camera service for `device` and return its handle.
    pub fn spawn(device: Box<dyn CameraDevice>, encoder: Box<dyn FrameEncoder>) -> Self {
        let (tx, rx) = mpsc::channel(10);
        let camera = Camera::new(device, encoder, rx);
        tokio::task::spawn_local(camera.run());
        Self::new(tx)
    }

    pub async fn start(&self) -> Result<StreamHandle, CameraError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CameraCommand::Start(reply))
            .await
            .map_err(|_| CameraError::ServiceGone)?;

        rx.await.map_err(|_| CameraError::ServiceGone)?
    }

    /// Release the camera if it is running. Returns whether a stream was released.
    pub async fn stop(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(CameraCommand::Stop(reply)).await.is_err() {
            return false;
        }

        rx.await.unwrap_or(false)
    }

    pub async fn capture(&self, handle: StreamHandle) -> Result<CapturedImage, CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CameraCommand::Capture(handle, reply))
            .await
            .map_err(|_| CaptureError::ServiceGone)?;

        rx.await.map_err(|_| CaptureError::ServiceGone)?
    }
}
