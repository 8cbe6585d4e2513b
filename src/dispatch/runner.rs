//! Dispatcher task: turns UI commands into API calls and recorder actions.
//!
//! ```text
//! Command (mpsc) ──▶ Dispatcher::run()  ← tokio task
//!                      │
//!                      ├─ API commands   → tokio::spawn(api call) → Outcome
//!                      ├─ StartRecording → RecordingController::start
//!                      ├─ StopRecording  → RecordingController::stop
//!                      │                     └─ spawn(analyze_audio) → Outcome
//!                      └─ every 200 ms   → poll_chunks → RecordingProgress
//! ```
//!
//! API calls never run inline, so a slow analysis never holds up the next
//! recording.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::api::{ApiError, RecruitApi};
use crate::audio::{CaptureDevice, RecordingController};
use crate::forms::Ticket;

use super::messages::{Command, Outcome};

/// How often the take in progress is drained and reported.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

pub struct Dispatcher {
    api: Arc<dyn RecruitApi>,
    recorder: RecordingController,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn RecruitApi>,
        device: Arc<dyn CaptureDevice>,
        outcome_tx: mpsc::Sender<Outcome>,
    ) -> Self {
        Self {
            api,
            recorder: RecordingController::new(device),
            outcome_tx,
        }
    }

    /// Run until `command_rx` is closed.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<Command>) {
        let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = progress.tick() => self.report_progress(),
            }
        }

        log::info!("dispatch: command channel closed, dispatcher shutting down");
    }

    async fn handle(&mut self, command: Command) {
        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();

        match command {
            Command::GenerateJd { ticket, request } => spawn_call(
                tx,
                async move { api.generate_jd(&request).await },
                move |result| Outcome::JdGenerated { ticket, result },
            ),
            Command::ScreenCv {
                ticket,
                file,
                jd_text,
            } => spawn_call(
                tx,
                async move { api.screen_cv(&file, &jd_text).await },
                move |result| Outcome::CvScreened { ticket, result },
            ),
            Command::GenerateQuiz { ticket, request } => spawn_call(
                tx,
                async move { api.generate_quiz(&request).await },
                move |result| Outcome::QuizGenerated { ticket, result },
            ),
            Command::EvaluateQuiz { ticket, request } => spawn_call(
                tx,
                async move { api.evaluate_quiz(&request).await },
                move |result| Outcome::QuizEvaluated { ticket, result },
            ),
            Command::CheckHealth => spawn_call(
                tx,
                async move { api.health().await },
                Outcome::Health,
            ),
            Command::StartRecording => self.start_recording().await,
            Command::StopRecording { ticket } => self.stop_recording(ticket).await,
        }
    }

    async fn start_recording(&mut self) {
        let outcome = match self.recorder.start().await {
            Ok(true) => Outcome::RecordingStarted,
            Ok(false) => return,
            Err(e) => {
                log::warn!("dispatch: microphone unavailable: {e}");
                Outcome::RecordingFailed {
                    detail: e.to_string(),
                }
            }
        };
        let _ = self.outcome_tx.send(outcome).await;
    }

    /// Runs inline on the command loop: commands queued behind the stop wait
    /// for the flush, which is capped by the recorder's 5 s timeout.  The
    /// analysis upload itself is spawned.
    async fn stop_recording(&mut self, ticket: Ticket) {
        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        let mut secs = 0.0;

        let stopped = self
            .recorder
            .stop(|blob| {
                secs = blob.duration_secs();
                log::info!(
                    "dispatch: analyzing {:.1}s of audio ({} bytes)",
                    secs,
                    blob.len()
                );
                spawn_call(
                    tx,
                    async move { api.analyze_audio(&blob).await },
                    move |result| Outcome::AudioAnalyzed { ticket, result },
                );
            })
            .await;

        let outcome = if stopped {
            Outcome::RecordingStopped { ticket, secs }
        } else {
            Outcome::StopIgnored { ticket }
        };
        let _ = self.outcome_tx.send(outcome).await;
    }

    fn report_progress(&mut self) {
        if let Some(progress) = self.recorder.poll_chunks() {
            // Progress is droppable; the next tick reports again.
            let _ = self.outcome_tx.try_send(Outcome::RecordingProgress {
                secs: progress.secs,
            });
        }
    }
}

/// Run one API call on its own task and deliver the wrapped outcome.
fn spawn_call<T, Fut, W>(tx: mpsc::Sender<Outcome>, call: Fut, wrap: W)
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    W: FnOnce(Result<T, String>) -> Outcome + Send + 'static,
{
    tokio::spawn(async move {
        let result = call.await.map_err(|e| {
            log::warn!("dispatch: {e}");
            e.user_message().to_string()
        });
        if tx.send(wrap(result)).await.is_err() {
            log::debug!("dispatch: outcome dropped, UI has gone away");
        }
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
