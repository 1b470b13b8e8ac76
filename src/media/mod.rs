//! Media device lifecycle
//!
//! A session acquires one combined audio/video stream through a
//! [`MediaBackend`], parks it in a [`MediaHandle`] and toggles tracks on it.
//! The handle stops every track when released or dropped. A
//! [`MediaRecorder`] taps the stream's frames and groups them into chunks
//! that can be saved as one [`Recording`].

pub mod backend;
pub mod recorder;
pub mod stream;
pub mod virtual_device;

pub use backend::{
    MediaBackend, MediaBackendFactory, MediaConstraints, MediaError, MediaSource, TrackKind,
};
pub use recorder::{ChunkMetadata, MediaRecorder, RecorderConfig, Recording, RecordingError};
pub use stream::{
    CaptureStream, FrameFeed, MediaFrame, MediaHandle, MediaPhase, MediaState, MediaTrack,
};
pub use virtual_device::{
    DeviceBehavior, DeviceMonitor, VirtualMediaBackend, AUDIO_FRAME_BYTES, FRAME_INTERVAL,
    VIDEO_FRAME_BYTES,
};
