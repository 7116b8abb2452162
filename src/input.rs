use crate::capture::StreamHandle;
use crate::error::InvalidInputError;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

static IMAGE_MIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^image/[a-z0-9][a-z0-9.+-]*$").expect("valid regex"));

/// The currently active origin of an image to analyze
#[derive(Clone, PartialEq, Eq, Default)]
pub enum CaptureSource {
    #[default]
    None,
    FileBlob { bytes: Arc<[u8]>, mime: String },
    CameraStream(StreamHandle),
}

impl fmt::Debug for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::FileBlob { bytes, mime } => f
                .debug_struct("FileBlob")
                .field("len", &bytes.len())
                .field("mime", mime)
                .finish(),
            Self::CameraStream(handle) => f.debug_tuple("CameraStream").field(handle).finish(),
        }
    }
}

/// Tracks which capture source is active
///
/// Holds a single `CaptureSource`, so at most one source is ever active and a
/// switch is one assignment. Each switch returns the source it replaced so the
/// caller can release a preempted camera.
#[derive(Debug, Default)]
pub struct InputSelector {
    source: CaptureSource,
}

impl InputSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and select an uploaded file. On rejection the current source
    /// is left untouched.
    pub fn select_file(
        &mut self,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<CaptureSource, InvalidInputError> {
        if bytes.is_empty() {
            return Err(InvalidInputError::Empty);
        }

        let mime = mime.trim();
        if !IMAGE_MIME.is_match(mime) {
            return Err(InvalidInputError::NotAnImage(mime.to_string()));
        }

        let source = CaptureSource::FileBlob {
            bytes: bytes.into(),
            mime: mime.to_ascii_lowercase(),
        };
        Ok(std::mem::replace(&mut self.source, source))
    }

    pub fn select_camera(&mut self, handle: StreamHandle) -> CaptureSource {
        std::mem::replace(&mut self.source, CaptureSource::CameraStream(handle))
    }

    pub fn clear(&mut self) -> CaptureSource {
        std::mem::take(&mut self.source)
    }

    pub fn current_source(&self) -> &CaptureSource {
        &self.source
    }
}
