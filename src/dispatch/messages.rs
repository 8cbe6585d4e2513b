//! Messages exchanged between the UI thread and the dispatcher task.
//!
//! Every request that completes asynchronously carries the [`Ticket`] issued
//! by its form; the UI hands the ticket back to the form, which ignores it if
//! it is no longer the outstanding one.

use crate::api::{
    AudioAnalysisResponse, CvFile, CvScreenResponse, HealthStatus, JdRequest, JdResponse,
    QuizEvaluationRequest, QuizEvaluationResponse, QuizRequest, QuizResponse,
};
use crate::forms::Ticket;

/// Commands sent from the UI thread to the dispatcher.
#[derive(Debug, Clone)]
pub enum Command {
    GenerateJd {
        ticket: Ticket,
        request: JdRequest,
    },
    ScreenCv {
        ticket: Ticket,
        file: CvFile,
        jd_text: String,
    },
    GenerateQuiz {
        ticket: Ticket,
        request: QuizRequest,
    },
    EvaluateQuiz {
        ticket: Ticket,
        request: QuizEvaluationRequest,
    },
    /// Acquire the microphone and begin a take.
    StartRecording,
    /// Finish the take and analyze it under `ticket`.
    StopRecording { ticket: Ticket },
    CheckHealth,
}

/// Completions and progress delivered from the dispatcher to the UI.
///
/// Failed API calls carry the fixed user-facing message, never the cause.
#[derive(Debug, Clone)]
pub enum Outcome {
    JdGenerated {
        ticket: Ticket,
        result: Result<JdResponse, String>,
    },
    CvScreened {
        ticket: Ticket,
        result: Result<CvScreenResponse, String>,
    },
    QuizGenerated {
        ticket: Ticket,
        result: Result<QuizResponse, String>,
    },
    QuizEvaluated {
        ticket: Ticket,
        result: Result<QuizEvaluationResponse, String>,
    },
    RecordingStarted,
    /// The microphone could not be opened; `detail` is for logs only.
    RecordingFailed { detail: String },
    /// Seconds captured so far in the current take.
    RecordingProgress { secs: f32 },
    /// The take was finalized and its analysis dispatched.
    RecordingStopped { ticket: Ticket, secs: f32 },
    /// Stop arrived while nothing was recording.
    StopIgnored { ticket: Ticket },
    AudioAnalyzed {
        ticket: Ticket,
        result: Result<AudioAnalysisResponse, String>,
    },
    Health(Result<HealthStatus, String>),
}
