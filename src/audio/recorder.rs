//! Recording state machine.
//!
//! [`RecordingController`] owns the microphone between `start` and `stop`
//! and turns one take into one [`AudioBlob`].
//!
//! ```text
//! Idle ──start (mic granted)──▶ Recording
//!      ──start (mic refused)──▶ Idle            error returned
//! Recording ──stop──▶ Finalizing                stream stopped, mic released
//! Finalizing ──flush complete, blob dispatched──▶ Idle
//! ```
//!
//! `start` outside `Idle` and `stop` outside `Recording` are no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::blob::{AudioBlob, AudioFormat};
use super::capture::{AudioChunk, CaptureDevice, CaptureError, CaptureStream, ChunkReceiver};

/// Upper bound on waiting for a stopped stream to close its channel.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// RecordingPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingPhase {
    /// No microphone held.
    #[default]
    Idle,
    /// Microphone held; chunks are being buffered.
    Recording,
    /// Stream stopped; waiting for the final chunks.
    Finalizing,
}

impl RecordingPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RecordingPhase::Idle => "Ready to Record",
            RecordingPhase::Recording => "Recording...",
            RecordingPhase::Finalizing => "Finishing recording...",
        }
    }
}

// ---------------------------------------------------------------------------
// Take
// ---------------------------------------------------------------------------

/// Chunks received so far, in arrival order.
struct TakeBuffer {
    chunks: Vec<AudioChunk>,
    bytes: usize,
    format: AudioFormat,
}

impl TakeBuffer {
    fn push(&mut self, chunk: AudioChunk) {
        if chunk.is_empty() {
            return;
        }
        self.bytes += chunk.len();
        self.chunks.push(chunk);
    }

    fn progress(&self) -> TakeProgress {
        TakeProgress {
            bytes: self.bytes,
            secs: self.format.duration_secs(self.bytes),
        }
    }
}

/// Everything belonging to the take in progress.
struct Take {
    stream: Box<dyn CaptureStream>,
    chunks_rx: ChunkReceiver,
    buffer: TakeBuffer,
}

/// Snapshot of the take in progress, reported while recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeProgress {
    pub bytes: usize,
    pub secs: f32,
}

// ---------------------------------------------------------------------------
// RecordingController
// ---------------------------------------------------------------------------

pub struct RecordingController {
    device: Arc<dyn CaptureDevice>,
    phase: RecordingPhase,
    take: Option<Take>,
}

impl RecordingController {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            phase: RecordingPhase::Idle,
            take: None,
        }
    }

    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    /// Acquire the microphone and begin a take.
    ///
    /// Returns `Ok(false)` when not `Idle` (nothing happens).  On error the
    /// controller stays `Idle`.
    pub async fn start(&mut self) -> Result<bool, CaptureError> {
        if self.phase != RecordingPhase::Idle {
            log::debug!("recorder: start ignored in {:?}", self.phase);
            return Ok(false);
        }

        let (chunks_tx, chunks_rx) = mpsc::unbounded_channel();
        let stream = self.device.open(chunks_tx).await?;
        let format = stream.format();

        self.take = Some(Take {
            stream,
            chunks_rx,
            buffer: TakeBuffer {
                chunks: Vec::new(),
                bytes: 0,
                format,
            },
        });
        self.phase = RecordingPhase::Recording;
        log::debug!("recorder: Idle → Recording");
        Ok(true)
    }

    /// Move every chunk that has already arrived into the take buffer.
    ///
    /// Returns `None` when no take is in progress.
    pub fn poll_chunks(&mut self) -> Option<TakeProgress> {
        let take = self.take.as_mut()?;
        while let Ok(chunk) = take.chunks_rx.try_recv() {
            take.buffer.push(chunk);
        }
        Some(take.buffer.progress())
    }

    /// Stop the take, wait for the stream to flush, and hand the finished
    /// blob to `dispatch`.
    ///
    /// Returns `false` (and never calls `dispatch`) when not `Recording`.
    /// An empty take still produces an (empty) blob.
    pub async fn stop<F>(&mut self, dispatch: F) -> bool
    where
        F: FnOnce(AudioBlob),
    {
        if self.phase != RecordingPhase::Recording {
            log::debug!("recorder: stop ignored in {:?}", self.phase);
            return false;
        }
        let Some(take) = self.take.take() else {
            self.phase = RecordingPhase::Idle;
            return false;
        };
        let Take {
            stream,
            mut chunks_rx,
            mut buffer,
        } = take;

        self.phase = RecordingPhase::Finalizing;
        log::debug!("recorder: Recording → Finalizing");

        // The stream closes the channel after its last chunk.
        stream.stop();
        let flushed = tokio::time::timeout(FLUSH_TIMEOUT, async {
            while let Some(chunk) = chunks_rx.recv().await {
                buffer.push(chunk);
            }
        })
        .await;
        if flushed.is_err() {
            log::warn!("recorder: capture stream did not close within {FLUSH_TIMEOUT:?}");
        }

        let blob = AudioBlob::from_chunks(buffer.format, buffer.chunks);
        log::debug!("recorder: take finalized ({} bytes)", blob.len());
        dispatch(blob);

        self.phase = RecordingPhase::Idle;
        log::debug!("recorder: Finalizing → Idle");
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
