//! Microphone capture via `cpal`.
//!
//! [`CaptureDevice::open`] acquires the microphone and starts delivering
//! [`AudioChunk`]s over an unbounded channel.  The returned
//! [`CaptureStream`] releases the hardware when stopped; the chunk channel
//! closes once the last buffered chunk has been sent, which is the
//! completion signal the recorder awaits.
//!
//! [`CpalCapture`] runs each stream on a dedicated OS thread because
//! `cpal::Stream` is not `Send` on every platform.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::blob::AudioFormat;
use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One fragment of captured audio: 16-bit little-endian interleaved PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    bytes: Vec<u8>,
}

impl AudioChunk {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Convert `f32` samples in `[-1.0, 1.0]` to 16-bit PCM.  Out-of-range
    /// samples are clamped.
    pub fn from_samples(samples: &[f32]) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub type ChunkSender = mpsc::UnboundedSender<AudioChunk>;
pub type ChunkReceiver = mpsc::UnboundedReceiver<AudioChunk>;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring the microphone.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access was denied")]
    PermissionDenied,

    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("input device {0:?} not found")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(cpal::PlayStreamError),

    #[error("capture thread exited before the stream started")]
    Disconnected,
}

/// Backends report a refused microphone as a backend-specific error.
fn mentions_permission(description: &str) -> bool {
    let lower = description.to_ascii_lowercase();
    lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
}

impl From<cpal::BuildStreamError> for CaptureError {
    fn from(err: cpal::BuildStreamError) -> Self {
        let denied = matches!(
            &err,
            cpal::BuildStreamError::BackendSpecific { err: inner } if mentions_permission(&inner.description)
        );
        if denied {
            CaptureError::PermissionDenied
        } else if matches!(err, cpal::BuildStreamError::DeviceNotAvailable) {
            CaptureError::NoDevice
        } else {
            CaptureError::BuildStream(err)
        }
    }
}

impl From<cpal::PlayStreamError> for CaptureError {
    fn from(err: cpal::PlayStreamError) -> Self {
        let denied = matches!(
            &err,
            cpal::PlayStreamError::BackendSpecific { err: inner } if mentions_permission(&inner.description)
        );
        if denied {
            CaptureError::PermissionDenied
        } else if matches!(err, cpal::PlayStreamError::DeviceNotAvailable) {
            CaptureError::NoDevice
        } else {
            CaptureError::PlayStream(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Device / stream traits
// ---------------------------------------------------------------------------

/// A source of microphone streams.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the microphone and start sending chunks to `chunks`.
    ///
    /// The implementation must drop every clone of `chunks` once the stream
    /// has been stopped and flushed.
    async fn open(&self, chunks: ChunkSender) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A running capture stream.
pub trait CaptureStream: Send {
    fn format(&self) -> AudioFormat;

    /// Stop capturing and release the hardware.  Remaining chunks are
    /// flushed before the chunk channel closes.
    fn stop(self: Box<Self>);
}

// ---------------------------------------------------------------------------
// CpalCapture
// ---------------------------------------------------------------------------

/// Microphone capture built on `cpal`.
///
/// ```rust,no_run
/// use recruit_assist::audio::{CaptureDevice, CpalCapture};
/// use recruit_assist::config::AudioConfig;
///
/// # async fn example() {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let capture = CpalCapture::from_config(&AudioConfig::default());
/// let stream = capture.open(tx).await.unwrap();
/// // ... later
/// stream.stop();
/// while let Some(chunk) = rx.recv().await {
///     println!("{} bytes", chunk.len());
/// }
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpalCapture {
    /// `None` selects the host's default input device.
    device_name: Option<String>,
}

impl CpalCapture {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            device_name: config.input_device.clone(),
        }
    }

    /// Names of all input devices on the default host.
    pub fn input_device_names() -> Result<Vec<String>, CaptureError> {
        let host = cpal::default_host();
        let names = host
            .input_devices()?
            .filter_map(|d| d.name().ok())
            .collect();
        Ok(names)
    }
}

#[async_trait]
impl CaptureDevice for CpalCapture {
    async fn open(&self, chunks: ChunkSender) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let (ready_tx, ready_rx) = oneshot::channel::<Result<AudioFormat, CaptureError>>();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();
        let device_name = self.device_name.clone();

        std::thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || {
                let stream = match build_stream(device_name.as_deref(), chunks) {
                    Ok((stream, format)) => {
                        let _ = ready_tx.send(Ok(format));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Returns on stop() or when the handle is dropped.
                let _ = stop_rx.recv();
                drop(stream);
                log::debug!("capture: microphone released");
            })
            .map_err(|e| {
                log::error!("failed to spawn capture thread: {e}");
                CaptureError::Disconnected
            })?;

        let format = ready_rx.await.map_err(|_| CaptureError::Disconnected)??;
        log::info!(
            "capture: microphone open ({} Hz, {} ch)",
            format.sample_rate,
            format.channels
        );

        Ok(Box::new(CpalStream { stop_tx, format }))
    }
}

fn build_stream(
    device_name: Option<&str>,
    chunks: ChunkSender,
) -> Result<(cpal::Stream, AudioFormat), CaptureError> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| CaptureError::DeviceNotFound(name.to_string()))?,
        None => host.default_input_device().ok_or(CaptureError::NoDevice)?,
    };

    let supported = device.default_input_config()?;
    let format = AudioFormat {
        sample_rate: supported.sample_rate().0,
        channels: supported.channels(),
    };
    let config: cpal::StreamConfig = supported.into();

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            if data.is_empty() {
                return;
            }
            // Receiver gone means the take was abandoned.
            let _ = chunks.send(AudioChunk::from_samples(data));
        },
        |err: cpal::StreamError| {
            log::error!("cpal stream error: {err}");
        },
        None,
    )?;

    stream.play()?;
    Ok((stream, format))
}

/// Handle to a stream running on its capture thread.
struct CpalStream {
    stop_tx: std::sync::mpsc::Sender<()>,
    format: AudioFormat,
}

impl CaptureStream for CpalStream {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn stop(self: Box<Self>) {
        let _ = self.stop_tx.send(());
    }
}

// ---------------------------------------------------------------------------
// ScriptedDevice (tests)
// ---------------------------------------------------------------------------

/// Test double that replays fixed chunks instead of touching hardware.
///
/// `live` chunks are delivered as soon as the stream opens; `tail` chunks
/// are flushed when the stream is stopped.
#[cfg(test)]
pub struct ScriptedDevice {
    pub live: Vec<Vec<u8>>,
    pub tail: Vec<Vec<u8>>,
    pub deny: bool,
    pub opened: std::sync::atomic::AtomicUsize,
    pub released: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl ScriptedDevice {
    pub const FORMAT: AudioFormat = AudioFormat {
        sample_rate: 16_000,
        channels: 1,
    };

    pub fn new(live: Vec<Vec<u8>>, tail: Vec<Vec<u8>>) -> Self {
        Self {
            live,
            tail,
            deny: false,
            opened: std::sync::atomic::AtomicUsize::new(0),
            released: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn open_count(&self) -> usize {
        self.opened.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn was_released(&self) -> bool {
        self.released.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CaptureDevice for ScriptedDevice {
    async fn open(&self, chunks: ChunkSender) -> Result<Box<dyn CaptureStream>, CaptureError> {
        self.opened
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.deny {
            return Err(CaptureError::PermissionDenied);
        }
        self.released
            .store(false, std::sync::atomic::Ordering::SeqCst);
        for bytes in &self.live {
            let _ = chunks.send(AudioChunk::new(bytes.clone()));
        }
        Ok(Box::new(ScriptedStream {
            tail: self.tail.clone(),
            chunks,
            released: std::sync::Arc::clone(&self.released),
        }))
    }
}

#[cfg(test)]
struct ScriptedStream {
    tail: Vec<Vec<u8>>,
    chunks: ChunkSender,
    released: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl CaptureStream for ScriptedStream {
    fn format(&self) -> AudioFormat {
        ScriptedDevice::FORMAT
    }

    fn stop(self: Box<Self>) {
        let ScriptedStream {
            tail,
            chunks,
            released,
        } = *self;
        released.store(true, std::sync::atomic::Ordering::SeqCst);
        for bytes in tail {
            let _ = chunks.send(AudioChunk::new(bytes));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_convert_to_i16_le() {
        let chunk = AudioChunk::from_samples(&[0.0, 1.0, -1.0, 2.0]);
        assert_eq!(chunk.len(), 8);
        let values: Vec<i16> = chunk
            .bytes()
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(values, vec![0, i16::MAX, -i16::MAX, i16::MAX]);
    }

    #[test]
    fn permission_wording_is_recognised() {
        assert!(mentions_permission("Microphone permission denied by user"));
        assert!(mentions_permission("Access DENIED"));
        assert!(!mentions_permission("sample format not supported"));
    }

    #[test]
    fn backend_permission_error_maps_to_permission_denied() {
        let err = cpal::BuildStreamError::BackendSpecific {
            err: cpal::BackendSpecificError {
                description: "permission denied".into(),
            },
        };
        assert!(matches!(CaptureError::from(err), CaptureError::PermissionDenied));

        let err = cpal::BuildStreamError::DeviceNotAvailable;
        assert!(matches!(CaptureError::from(err), CaptureError::NoDevice));

        let err = cpal::BuildStreamError::StreamConfigNotSupported;
        assert!(matches!(CaptureError::from(err), CaptureError::BuildStream(_)));
    }

    #[test]
    fn chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
        assert_send::<Box<dyn CaptureStream>>();
    }

    #[tokio::test]
    async fn scripted_stream_closes_channel_on_stop() {
        let device = ScriptedDevice::new(vec![vec![1, 2]], vec![vec![3]]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let stream = device.open(tx).await.unwrap();
        stream.stop();

        let mut received = Vec::new();
        while let Some(chunk) = rx.recv().await {
            received.extend_from_slice(chunk.bytes());
        }
        assert_eq!(received, vec![1, 2, 3]);
        assert!(device.was_released());
    }
}
