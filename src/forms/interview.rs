//! Live-interview page: recording controls and audio analysis.
//!
//! The recorder itself lives in the dispatcher task; this page mirrors its
//! phase from outcome messages so the UI can enable the right control.
//!
//! ```text
//! request_start ─▶ (dispatcher) ─▶ on_started | on_start_failed
//! request_stop  ─▶ (dispatcher) ─▶ on_stopped ─▶ on_analyzed
//!                               └▶ on_stop_ignored
//! ```

use crate::api::AudioAnalysisResponse;
use crate::audio::RecordingPhase;

use super::submission::{Submission, Ticket};

pub const MIC_UNAVAILABLE: &str =
    "Could not access microphone. Please ensure you have granted permission.";

#[derive(Debug, Default)]
pub struct InterviewPage {
    phase: RecordingPhase,
    start_pending: bool,
    elapsed_secs: f32,
    pub analysis: Submission<AudioAnalysisResponse>,
}

impl InterviewPage {
    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis.is_submitting()
    }

    pub fn status_label(&self) -> &'static str {
        if self.phase == RecordingPhase::Idle && self.is_analyzing() {
            "Analyzing..."
        } else {
            self.phase.label()
        }
    }

    /// Start is offered only when idle and no analysis is pending.
    pub fn can_start(&self) -> bool {
        self.phase == RecordingPhase::Idle && !self.start_pending && !self.is_analyzing()
    }

    /// A start command is queued but the device has not answered yet.
    pub fn is_start_pending(&self) -> bool {
        self.start_pending
    }

    pub fn can_stop(&self) -> bool {
        self.phase == RecordingPhase::Recording
    }

    /// Returns `true` when a start command should be sent.
    pub fn request_start(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.start_pending = true;
        true
    }

    pub fn on_started(&mut self) {
        self.start_pending = false;
        self.phase = RecordingPhase::Recording;
        self.elapsed_secs = 0.0;
        self.analysis.clear_outcome();
    }

    pub fn on_start_failed(&mut self) {
        self.start_pending = false;
        self.phase = RecordingPhase::Idle;
        self.analysis.fail_validation(MIC_UNAVAILABLE);
    }

    pub fn on_progress(&mut self, secs: f32) {
        if self.phase == RecordingPhase::Recording {
            self.elapsed_secs = secs;
        }
    }

    /// Issue the analysis ticket that travels with the stop command.
    pub fn request_stop(&mut self) -> Option<Ticket> {
        if !self.can_stop() {
            return None;
        }
        let ticket = self.analysis.begin()?;
        self.phase = RecordingPhase::Finalizing;
        Some(ticket)
    }

    /// The take was finalized and handed to the analysis call.
    pub fn on_stopped(&mut self, secs: f32) {
        self.phase = RecordingPhase::Idle;
        self.elapsed_secs = secs;
    }

    /// The recorder was not recording after all; no analysis will follow.
    pub fn on_stop_ignored(&mut self, ticket: Ticket) {
        self.phase = RecordingPhase::Idle;
        self.analysis.abandon(ticket);
    }

    pub fn on_analyzed(&mut self, ticket: Ticket, outcome: Result<AudioAnalysisResponse, String>) {
        self.analysis.complete(ticket, outcome);
    }
}
