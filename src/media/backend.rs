use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::stream::CaptureStream;

/// Kind of a capture track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// What to request from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        // Interviews always request the combined stream
        Self {
            audio: true,
            video: true,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to use the camera or microphone was denied")]
    PermissionDenied,

    #[error("no capture device found")]
    DeviceNotFound,

    #[error("no capture stream is active")]
    NoStream,

    #[error("stream has no {0} track")]
    MissingTrack(TrackKind),

    #[error("media backend error: {0}")]
    Backend(String),
}

/// Media capture backend trait
///
/// Implementations hand out a live stream with independently toggleable tracks.
/// The caller owns the returned stream and is responsible for stopping it.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Request a capture stream matching the constraints
    async fn acquire(&self, constraints: MediaConstraints) -> Result<CaptureStream, MediaError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Media source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    /// In-process virtual camera and microphone
    Virtual,
    /// Host without capture devices
    None,
}

/// Media backend factory
pub struct MediaBackendFactory;

impl MediaBackendFactory {
    pub fn create(source: MediaSource) -> Box<dyn MediaBackend> {
        match source {
            MediaSource::Virtual => Box::new(super::VirtualMediaBackend::new()),
            MediaSource::None => Box::new(NoDeviceBackend),
        }
    }
}

/// Backend for hosts with no camera or microphone; every acquisition fails.
struct NoDeviceBackend;

#[async_trait]
impl MediaBackend for NoDeviceBackend {
    async fn acquire(&self, _constraints: MediaConstraints) -> Result<CaptureStream, MediaError> {
        Err(MediaError::DeviceNotFound)
    }

    fn name(&self) -> &str {
        "none"
    }
}
