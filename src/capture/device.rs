use crate::error::{CameraError, CaptureError};
use image::RgbImage;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Identifies one acquisition of the camera.
///
/// Ids only ever grow, so a handle from an earlier acquisition never matches
/// the live stream again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle {
    id: u64,
}

impl StreamHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A live video stream
///
/// Dropping the stream releases the device and all of its tracks.
pub trait VideoStream {
    /// Sample the most recent frame. Fails with `StreamEnded` when the
    /// device went away underneath us.
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError>;
}

/// Platform video input that hands out exclusive streams
pub trait CameraDevice {
    fn open(&mut self) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// Camera backed by a snapshot feed
///
/// An external capture tool keeps overwriting a single still at `feed_path`
/// (e.g. `ffmpeg -f v4l2 -i /dev/video0 -update 1 frame.jpg`). Each read
/// decodes the latest still; a vanished feed means the device disconnected.
pub struct SnapshotCamera {
    feed_path: PathBuf,
}

impl SnapshotCamera {
    pub fn new(feed_path: impl Into<PathBuf>) -> Self {
        Self {
            feed_path: feed_path.into(),
        }
    }
}

impl CameraDevice for SnapshotCamera {
    fn open(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        match std::fs::metadata(&self.feed_path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(CameraError::NoDevice),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CameraError::NoDevice),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(CameraError::PermissionDenied);
            }
            Err(e) => return Err(CameraError::Unavailable(e.to_string())),
        }

        tracing::info!("Camera feed opened at {:?}", self.feed_path);
        Ok(Box::new(SnapshotStream {
            feed_path: self.feed_path.clone(),
        }))
    }
}

struct SnapshotStream {
    feed_path: PathBuf,
}

impl VideoStream for SnapshotStream {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        let bytes = std::fs::read(&self.feed_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CaptureError::StreamEnded("camera feed disappeared".to_string()),
            _ => CaptureError::StreamEnded(e.to_string()),
        })?;

        let frame = image::load_from_memory(&bytes)
            .map_err(|e| CaptureError::Encoding(format!("unreadable frame: {}", e)))?;

        Ok(frame.to_rgb8())
    }
}

impl Drop for SnapshotStream {
    fn drop(&mut self) {
        tracing::debug!("Camera feed released: {:?}", self.feed_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_frame(path: &std::path::Path) {
        let frame = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        frame.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_open_missing_feed_reports_no_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = SnapshotCamera::new(dir.path().join("frame.png"));

        assert_eq!(camera.open().err(), Some(CameraError::NoDevice));
    }

    #[test]
    fn test_open_directory_reports_no_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = SnapshotCamera::new(dir.path());

        assert_eq!(camera.open().err(), Some(CameraError::NoDevice));
    }

    #[test]
    fn test_reads_latest_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_frame(&path);

        let mut camera = SnapshotCamera::new(&path);
        let mut stream = camera.open().unwrap();
        let frame = stream.read_frame().unwrap();

        assert_eq!(frame.dimensions(), (4, 4));
        assert_eq!(frame.get_pixel(0, 0), &Rgb([200, 10, 10]));
    }

    #[test]
    fn test_vanished_feed_ends_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_frame(&path);

        let mut camera = SnapshotCamera::new(&path);
        let mut stream = camera.open().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(stream.read_frame(), Err(CaptureError::StreamEnded(_))));
    }
}
