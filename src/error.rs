use thiserror::Error;

/// Failures acquiring the video input device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("no video input device available")]
    NoDevice,

    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("camera service is not running")]
    ServiceGone,
}

/// Failures sampling a still image from a live stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("stream handle is stale")]
    StaleHandle,

    #[error("stream ended: {0}")]
    StreamEnded(String),

    #[error("frame encoding failed: {0}")]
    Encoding(String),

    #[error("camera service is not running")]
    ServiceGone,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("selected file is empty")]
    Empty,

    #[error("selected file is not an image (content type {0:?})")]
    NotAnImage(String),

    #[error("could not read file: {0}")]
    Unreadable(String),

    #[error("unknown language code {0:?}")]
    UnknownLanguage(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response is missing the emotion label")]
    MissingEmotion,

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("username and password are required")]
    EmptyCredentials,

    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
}

/// Every user-visible failure of the capture/analysis workflow.
///
/// None of these are fatal; each one is reported once and the user may retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("please select an image or start the camera first")]
    NoInput,

    #[error("camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("emotion detection failed: {0}")]
    Detection(#[from] DetectionError),

    #[error("recommendations failed: {0}")]
    Recommendation(#[from] RecommendationError),

    #[error("{0}")]
    Auth(#[from] AuthError),
}
