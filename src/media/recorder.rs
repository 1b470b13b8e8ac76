use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::stream::{FrameFeed, MediaFrame};

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Span of frames grouped into one chunk (default: 1 second)
    pub chunk_duration: Duration,
}

impl RecorderConfig {
    pub fn new(chunk_duration: Duration) -> Self {
        Self { chunk_duration }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordingError {
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording is in progress")]
    NotRecording,

    #[error("the recording must be stopped before it can be saved")]
    StillRecording,

    #[error("nothing has been recorded")]
    NothingCaptured,
}

/// Metadata for a single chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Chunk number (0-indexed)
    pub chunk_index: usize,
    /// Timestamp of the first frame, in stream milliseconds
    pub start_ms: u64,
    /// Timestamp of the last frame, in stream milliseconds
    pub end_ms: u64,
    pub frame_count: usize,
    pub size_bytes: usize,
}

struct Chunk {
    metadata: ChunkMetadata,
    data: Vec<u8>,
}

impl Chunk {
    fn new(chunk_index: usize, start_ms: u64) -> Self {
        Self {
            metadata: ChunkMetadata {
                chunk_index,
                start_ms,
                end_ms: start_ms,
                frame_count: 0,
                size_bytes: 0,
            },
            data: Vec::new(),
        }
    }

    fn write_frame(&mut self, frame: MediaFrame) {
        for payload in [frame.video, frame.audio].into_iter().flatten() {
            self.data.extend_from_slice(&payload);
        }
        self.metadata.end_ms = frame.timestamp_ms;
        self.metadata.frame_count += 1;
        self.metadata.size_bytes = self.data.len();
    }
}

/// A finished recording: every captured chunk joined into one artifact
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: Uuid,
    pub mime_type: String,
    pub duration_ms: u64,
    pub size_bytes: usize,
    pub chunks: Vec<ChunkMetadata>,
    #[serde(skip)]
    data: Vec<u8>,
}

impl Recording {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn file_name(&self) -> String {
        format!("recording-{}.bin", self.id)
    }

    /// Write the artifact into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create recording directory: {:?}", dir))?;

        let path = dir.join(self.file_name());
        fs::write(&path, &self.data)
            .with_context(|| format!("Failed to write recording: {:?}", path))?;

        info!("Recording {} saved to {:?}", self.id, path);
        Ok(path)
    }
}

struct Capture {
    stop: oneshot::Sender<()>,
    task: JoinHandle<Vec<Chunk>>,
}

/// Chunked recorder for a live capture stream.
///
/// Starting a new recording discards whatever the previous one captured.
pub struct MediaRecorder {
    config: RecorderConfig,
    mime_type: String,
    capture: Option<Capture>,
    chunks: Vec<Chunk>,
}

impl MediaRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            mime_type: String::new(),
            capture: None,
            chunks: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_some()
    }

    /// Chunks kept from the last stopped recording
    pub fn captured(&self) -> Vec<ChunkMetadata> {
        self.chunks.iter().map(|c| c.metadata.clone()).collect()
    }

    pub fn start(&mut self, feed: FrameFeed) -> Result<(), RecordingError> {
        if self.capture.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }

        self.chunks.clear();
        self.mime_type = feed.mime_type;

        let chunk_ms = (self.config.chunk_duration.as_millis() as u64).max(1);
        let (stop, stop_rx) = oneshot::channel();
        let task = tokio::spawn(capture(feed.frames, stop_rx, chunk_ms));
        self.capture = Some(Capture { stop, task });

        info!("Recording started ({}ms chunks)", chunk_ms);
        Ok(())
    }

    /// Stop capturing and keep the chunks for [`save`](Self::save)
    pub async fn stop(&mut self) -> Result<Vec<ChunkMetadata>, RecordingError> {
        let capture = self.capture.take().ok_or(RecordingError::NotRecording)?;

        // The task may already have exited on a closed stream
        let _ = capture.stop.send(());
        self.chunks = match capture.task.await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Recorder task ended abnormally: {}", e);
                Vec::new()
            }
        };

        info!("Recording stopped: {} chunk(s) captured", self.chunks.len());
        Ok(self.captured())
    }

    pub fn save(&self) -> Result<Recording, RecordingError> {
        if self.capture.is_some() {
            return Err(RecordingError::StillRecording);
        }
        let (Some(first), Some(last)) = (self.chunks.first(), self.chunks.last()) else {
            return Err(RecordingError::NothingCaptured);
        };

        let data: Vec<u8> = self
            .chunks
            .iter()
            .flat_map(|c| c.data.iter().copied())
            .collect();

        Ok(Recording {
            id: Uuid::new_v4(),
            mime_type: self.mime_type.clone(),
            duration_ms: last.metadata.end_ms - first.metadata.start_ms,
            size_bytes: data.len(),
            chunks: self.captured(),
            data,
        })
    }
}

impl Drop for MediaRecorder {
    fn drop(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.task.abort();
        }
    }
}

async fn capture(
    mut frames: broadcast::Receiver<MediaFrame>,
    mut stop: oneshot::Receiver<()>,
    chunk_ms: u64,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    loop {
        tokio::select! {
            biased;

            received = frames.recv() => match received {
                Ok(frame) => append_frame(&mut chunks, frame, chunk_ms),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Recorder fell behind, {} frame(s) dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = &mut stop => break,
        }
    }

    chunks
}

fn append_frame(chunks: &mut Vec<Chunk>, frame: MediaFrame, chunk_ms: u64) {
    let start_new = match chunks.last() {
        None => true,
        Some(chunk) => frame.timestamp_ms.saturating_sub(chunk.metadata.start_ms) >= chunk_ms,
    };

    if start_new {
        if let Some(done) = chunks.last() {
            debug!(
                "Chunk {} complete: {} frame(s), {} bytes",
                done.metadata.chunk_index, done.metadata.frame_count, done.metadata.size_bytes
            );
        }
        chunks.push(Chunk::new(chunks.len(), frame.timestamp_ms));
    }

    if let Some(chunk) = chunks.last_mut() {
        chunk.write_frame(frame);
    }
}
