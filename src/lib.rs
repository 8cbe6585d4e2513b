//! Desktop client for the recruitment assistant backend.
//!
//! ```text
//! RecruitApp (egui, UI thread)
//!    │  Command (mpsc)                Outcome (mpsc)  ▲
//!    ▼                                                │
//! Dispatcher (tokio) ──▶ RecruitApi (HTTP) ───────────┤
//!    └─▶ RecordingController ──▶ CaptureDevice (cpal) │
//! ```

pub mod api;
pub mod app;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod forms;
pub mod render;
