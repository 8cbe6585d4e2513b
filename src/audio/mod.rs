//! Microphone recording.
//!
//! ```text
//! CaptureDevice::open → CaptureStream → AudioChunk (mpsc) → RecordingController
//!                                     → AudioBlob (on stop) → upload as WAV
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recruit_assist::audio::{CpalCapture, RecordingController};
//! use recruit_assist::config::AppConfig;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let mut recorder = RecordingController::new(Arc::new(CpalCapture::from_config(&config.audio)));
//!
//! recorder.start().await?;
//! // ... speak ...
//! recorder
//!     .stop(|blob| println!("captured {:.1}s", blob.duration_secs()))
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod capture;
pub mod recorder;

pub use blob::{AudioBlob, AudioFormat};
pub use capture::{
    AudioChunk, CaptureDevice, CaptureError, CaptureStream, ChunkReceiver, ChunkSender,
    CpalCapture,
};
pub use recorder::{RecordingController, RecordingPhase, TakeProgress};

#[cfg(test)]
pub use capture::ScriptedDevice;
