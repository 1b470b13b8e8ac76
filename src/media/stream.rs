use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::{MediaError, TrackKind};

/// A single live capture track
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    fn enabled(&self) -> bool;

    /// Mute or unmute the track without stopping it
    fn set_enabled(&mut self, enabled: bool);

    /// Stop the track for good. Stopping twice is a no-op.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// One captured frame. Payloads are present only for tracks that were
/// enabled when the frame was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFrame {
    /// Milliseconds since the stream was acquired
    pub timestamp_ms: u64,
    pub video: Option<Vec<u8>>,
    pub audio: Option<Vec<u8>>,
}

impl MediaFrame {
    pub fn len(&self) -> usize {
        self.video.as_ref().map_or(0, Vec::len) + self.audio.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiving end of a stream's frames, as handed to a recorder
pub struct FrameFeed {
    pub frames: broadcast::Receiver<MediaFrame>,
    pub mime_type: String,
}

/// Live capture stream handed out by a [`MediaBackend`](super::MediaBackend)
pub struct CaptureStream {
    id: Uuid,
    tracks: Vec<Box<dyn MediaTrack>>,
    mime_type: String,
    frames: broadcast::Sender<MediaFrame>,
}

impl CaptureStream {
    /// `frames` is the sender the backend publishes captured frames on
    pub fn new(
        tracks: Vec<Box<dyn MediaTrack>>,
        mime_type: impl Into<String>,
        frames: broadcast::Sender<MediaFrame>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
            mime_type: mime_type.into(),
            frames,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn track(&self, kind: TrackKind) -> Option<&dyn MediaTrack> {
        self.tracks
            .iter()
            .find(|t| t.kind() == kind)
            .map(|t| &**t)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Frames captured from now on
    pub fn subscribe(&self) -> FrameFeed {
        FrameFeed {
            frames: self.frames.subscribe(),
            mime_type: self.mime_type.clone(),
        }
    }

    fn track_mut(&mut self, kind: TrackKind) -> Option<&mut Box<dyn MediaTrack>> {
        self.tracks.iter_mut().find(|t| t.kind() == kind)
    }

    fn stop_all(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }
}

impl std::fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Enabled flags mirrored from the live tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    pub video_enabled: bool,
    pub audio_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPhase {
    Uninitialized,
    Active,
    Released,
}

/// Exclusive owner of one capture stream.
///
/// The stream is stopped when the handle is released or dropped, whichever
/// comes first.
pub struct MediaHandle {
    stream: Option<CaptureStream>,
    phase: MediaPhase,
}

impl MediaHandle {
    pub fn new() -> Self {
        Self {
            stream: None,
            phase: MediaPhase::Uninitialized,
        }
    }

    /// Take ownership of a freshly acquired stream, releasing any previous one.
    pub fn attach(&mut self, stream: CaptureStream) {
        self.release();
        info!("Capture stream {} attached", stream.id());
        self.stream = Some(stream);
        self.phase = MediaPhase::Active;
    }

    pub fn phase(&self) -> MediaPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream_id(&self) -> Option<Uuid> {
        self.stream.as_ref().map(CaptureStream::id)
    }

    /// Flip the enabled flag of one track and return the new flag
    pub fn toggle(&mut self, kind: TrackKind) -> Result<bool, MediaError> {
        let stream = self.stream.as_mut().ok_or(MediaError::NoStream)?;
        let track = stream
            .track_mut(kind)
            .ok_or(MediaError::MissingTrack(kind))?;

        let enabled = !track.enabled();
        track.set_enabled(enabled);
        debug!("{} track {}", kind, if enabled { "enabled" } else { "disabled" });
        Ok(enabled)
    }

    /// Tap the attached stream's frames
    pub fn subscribe(&self) -> Result<FrameFeed, MediaError> {
        self.stream
            .as_ref()
            .map(CaptureStream::subscribe)
            .ok_or(MediaError::NoStream)
    }

    pub fn state(&self) -> MediaState {
        let flag = |kind| {
            self.stream
                .as_ref()
                .and_then(|s| s.track(kind))
                .map(|t| t.enabled())
                .unwrap_or(false)
        };

        MediaState {
            video_enabled: flag(TrackKind::Video),
            audio_enabled: flag(TrackKind::Audio),
        }
    }

    /// Stop every track and drop the stream. No-op when nothing is attached.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            info!("Capture stream {} released", stream.id());
            self.phase = MediaPhase::Released;
        }
    }
}

impl Default for MediaHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        self.release();
    }
}
