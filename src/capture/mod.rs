pub mod device;
pub mod encoder;
pub mod still;

#[cfg(test)]
pub mod fake;

pub use device::{CameraDevice, SnapshotCamera, StreamHandle, VideoStream};
pub use encoder::{FrameEncoder, JpegFrameEncoder};
pub use still::CapturedImage;
