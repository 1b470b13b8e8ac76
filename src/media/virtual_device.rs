// In-process capture device
//
// Stands in for a camera and microphone so sessions can run headless.
// Track state lives behind shared atomics so a `DeviceMonitor` can observe it
// after the stream has moved into a `MediaHandle`. A background task emits a
// synthetic frame every `FRAME_INTERVAL` until no track is live.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

use super::backend::{MediaBackend, MediaConstraints, MediaError, TrackKind};
use super::stream::{CaptureStream, MediaFrame, MediaTrack};

/// Spacing of synthetic frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Payload size of one synthetic video frame
pub const VIDEO_FRAME_BYTES: usize = 64;

/// Payload size of one synthetic audio frame
pub const AUDIO_FRAME_BYTES: usize = 32;

const MIME_TYPE: &str = "application/x-communisync-capture";

const FRAME_BUFFER: usize = 256;

#[derive(Debug, Default)]
struct TrackState {
    live: AtomicBool,
    enabled: AtomicBool,
}

struct VirtualTrack {
    kind: TrackKind,
    state: Arc<TrackState>,
}

impl MediaTrack for VirtualTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled.store(enabled, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.state.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.state.live.load(Ordering::SeqCst)
    }
}

/// How the virtual device answers acquisition requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceBehavior {
    Grant,
    /// Microphone present, no camera
    AudioOnly,
    DenyPermission,
    NoDevice,
}

/// Virtual camera + microphone backend
#[derive(Clone)]
pub struct VirtualMediaBackend {
    behavior: DeviceBehavior,
    monitor: DeviceMonitor,
}

impl VirtualMediaBackend {
    pub fn new() -> Self {
        Self::with_behavior(DeviceBehavior::Grant)
    }

    pub fn with_behavior(behavior: DeviceBehavior) -> Self {
        Self {
            behavior,
            monitor: DeviceMonitor::default(),
        }
    }

    /// Observer for the tracks handed out by this backend
    pub fn monitor(&self) -> DeviceMonitor {
        self.monitor.clone()
    }
}

impl Default for VirtualMediaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaBackend for VirtualMediaBackend {
    async fn acquire(&self, constraints: MediaConstraints) -> Result<CaptureStream, MediaError> {
        match self.behavior {
            DeviceBehavior::DenyPermission => return Err(MediaError::PermissionDenied),
            DeviceBehavior::NoDevice => return Err(MediaError::DeviceNotFound),
            DeviceBehavior::Grant | DeviceBehavior::AudioOnly => {}
        }

        let mut tracks: Vec<Box<dyn MediaTrack>> = Vec::new();
        let mut states = FrameSources::default();
        let mut wanted = Vec::new();
        if constraints.video && self.behavior != DeviceBehavior::AudioOnly {
            wanted.push(TrackKind::Video);
        }
        if constraints.audio {
            wanted.push(TrackKind::Audio);
        }

        for kind in wanted {
            let state = Arc::new(TrackState {
                live: AtomicBool::new(true),
                enabled: AtomicBool::new(true),
            });
            self.monitor.record(kind, Arc::clone(&state));
            match kind {
                TrackKind::Video => states.video = Some(Arc::clone(&state)),
                TrackKind::Audio => states.audio = Some(Arc::clone(&state)),
            }
            tracks.push(Box::new(VirtualTrack { kind, state }));
        }

        self.monitor.acquisitions.fetch_add(1, Ordering::SeqCst);
        info!("Virtual device granted {} track(s)", tracks.len());

        let (frames, _) = broadcast::channel(FRAME_BUFFER);
        tokio::spawn(produce_frames(states, frames.clone()));

        Ok(CaptureStream::new(tracks, MIME_TYPE, frames))
    }

    fn name(&self) -> &str {
        "virtual"
    }
}

#[derive(Default)]
struct FrameSources {
    video: Option<Arc<TrackState>>,
    audio: Option<Arc<TrackState>>,
}

impl FrameSources {
    fn any_live(&self) -> bool {
        [&self.video, &self.audio]
            .into_iter()
            .flatten()
            .any(|s| s.live.load(Ordering::SeqCst))
    }
}

fn payload(state: &Option<Arc<TrackState>>, size: usize, seq: u64) -> Option<Vec<u8>> {
    state
        .as_ref()
        .filter(|s| s.live.load(Ordering::SeqCst) && s.enabled.load(Ordering::SeqCst))
        .map(|_| vec![seq as u8; size])
}

async fn produce_frames(sources: FrameSources, frames: broadcast::Sender<MediaFrame>) {
    let start = Instant::now();
    let mut ticker = tokio::time::interval_at(start + FRAME_INTERVAL, FRAME_INTERVAL);
    let mut seq: u64 = 0;

    loop {
        ticker.tick().await;
        if !sources.any_live() {
            break;
        }

        let frame = MediaFrame {
            timestamp_ms: start.elapsed().as_millis() as u64,
            video: payload(&sources.video, VIDEO_FRAME_BYTES, seq),
            audio: payload(&sources.audio, AUDIO_FRAME_BYTES, seq),
        };
        // Nobody listening is fine
        let _ = frames.send(frame);
        seq += 1;
    }

    debug!("Virtual frame source stopped after {} frame(s)", seq);
}

/// Read-only view of the most recent tracks handed out by a virtual backend
#[derive(Clone, Default)]
pub struct DeviceMonitor {
    acquisitions: Arc<AtomicUsize>,
    video: Arc<std::sync::Mutex<Option<Arc<TrackState>>>>,
    audio: Arc<std::sync::Mutex<Option<Arc<TrackState>>>>,
}

impl DeviceMonitor {
    fn slot(&self, kind: TrackKind) -> &std::sync::Mutex<Option<Arc<TrackState>>> {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
        }
    }

    fn record(&self, kind: TrackKind, state: Arc<TrackState>) {
        if let Ok(mut slot) = self.slot(kind).lock() {
            *slot = Some(state);
        }
    }

    fn read(&self, kind: TrackKind, f: impl Fn(&TrackState) -> bool) -> bool {
        self.slot(kind)
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|s| f(&**s)))
            .unwrap_or(false)
    }

    /// Number of successful acquisitions
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn is_live(&self, kind: TrackKind) -> bool {
        self.read(kind, |s| s.live.load(Ordering::SeqCst))
    }

    pub fn is_enabled(&self, kind: TrackKind) -> bool {
        self.read(kind, |s| s.enabled.load(Ordering::SeqCst))
    }
}
