//! Recruitment assistant window: egui/eframe application.
//!
//! # Architecture
//!
//! [`RecruitApp`] is the top-level [`eframe::App`].  It owns the four page
//! forms and two channel endpoints:
//!
//! * `command_tx`: sends [`Command`] to the dispatcher task.
//! * `outcome_rx`: receives [`Outcome`] from the dispatcher; drained every
//!   frame and routed to the form that issued the ticket.
//!
//! # Pages
//!
//! | Page | Submits | Result |
//! |------|---------|--------|
//! | JD Generator | role, skills, level, company type | title + description |
//! | CV Screener | CV file + JD text | match score, strengths, gaps |
//! | Tech Quiz | role, level, count; then answers | questions; score + feedback |
//! | Live Interview | recorded audio | confidence, tone, summary, transcript |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::api::{ExperienceLevel, HealthStatus, SkillLevel};
use crate::config::{AppConfig, Page};
use crate::dispatch::{Command, Outcome};
use crate::forms::{CvForm, InterviewPage, JdForm, QuizForm};
use crate::render::{self, Band};

// ---------------------------------------------------------------------------
// BackendStatus
// ---------------------------------------------------------------------------

/// Reachability of the backend as last reported by `GET /health`.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    Checking,
    Healthy,
    Unhealthy(String),
}

impl BackendStatus {
    fn from_health(result: Result<HealthStatus, String>) -> Self {
        match result {
            Ok(status) if status.is_healthy() => BackendStatus::Healthy,
            Ok(status) => BackendStatus::Unhealthy(format!("Backend reports \"{}\"", status.status)),
            Err(message) => BackendStatus::Unhealthy(message),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BackendStatus::Checking => "Checking backend...",
            BackendStatus::Healthy => "Backend online",
            BackendStatus::Unhealthy(message) => message.as_str(),
        }
    }

    fn band(&self) -> Band {
        match self {
            BackendStatus::Checking => Band::Neutral,
            BackendStatus::Healthy => Band::Good,
            BackendStatus::Unhealthy(_) => Band::Poor,
        }
    }
}

// ---------------------------------------------------------------------------
// RecruitApp
// ---------------------------------------------------------------------------

pub struct RecruitApp {
    // ── Pages ────────────────────────────────────────────────────────────
    pub page: Page,
    pub jd: JdForm,
    pub cv: CvForm,
    pub quiz: QuizForm,
    pub interview: InterviewPage,

    // ── Status ───────────────────────────────────────────────────────────
    pub backend: BackendStatus,
    /// Path typed into the CV page as an alternative to drag and drop.
    cv_path_input: String,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<Command>,
    outcome_rx: mpsc::Receiver<Outcome>,

    config: AppConfig,
}

impl RecruitApp {
    /// Create the app and ask the dispatcher for an initial health check.
    pub fn new(
        command_tx: mpsc::Sender<Command>,
        outcome_rx: mpsc::Receiver<Outcome>,
        config: AppConfig,
    ) -> Self {
        let app = Self {
            page: config.ui.start_page,
            jd: JdForm::default(),
            cv: CvForm::default(),
            quiz: QuizForm::default(),
            interview: InterviewPage::default(),
            backend: BackendStatus::Checking,
            cv_path_input: String::new(),
            command_tx,
            outcome_rx,
            config,
        };
        app.send(Command::CheckHealth);
        app
    }

    /// Queue a command for the dispatcher without blocking the UI thread.
    fn send(&self, command: Command) -> bool {
        match self.command_tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("app: could not queue command: {e}");
                false
            }
        }
    }

    // ── Outcome routing ──────────────────────────────────────────────────

    /// Drain all pending outcomes (non-blocking).
    fn poll_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
        }
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::JdGenerated { ticket, result } => {
                self.jd.submission.complete(ticket, result);
            }
            Outcome::CvScreened { ticket, result } => {
                self.cv.submission.complete(ticket, result);
            }
            Outcome::QuizGenerated { ticket, result } => {
                self.quiz.complete_generation(ticket, result);
            }
            Outcome::QuizEvaluated { ticket, result } => {
                self.quiz.evaluation.complete(ticket, result);
            }
            Outcome::RecordingStarted => self.interview.on_started(),
            Outcome::RecordingFailed { detail } => {
                log::warn!("app: recording failed: {detail}");
                self.interview.on_start_failed();
            }
            Outcome::RecordingProgress { secs } => self.interview.on_progress(secs),
            Outcome::RecordingStopped { secs, .. } => self.interview.on_stopped(secs),
            Outcome::StopIgnored { ticket } => self.interview.on_stop_ignored(ticket),
            Outcome::AudioAnalyzed { ticket, result } => {
                self.interview.on_analyzed(ticket, result);
            }
            Outcome::Health(result) => self.backend = BackendStatus::from_health(result),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn submit_jd(&mut self) {
        if let Some((ticket, request)) = self.jd.submit() {
            if !self.send(Command::GenerateJd { ticket, request }) {
                self.jd.submission.abandon(ticket);
            }
        }
    }

    fn submit_cv(&mut self) {
        if let Some((ticket, file, jd_text)) = self.cv.submit() {
            let command = Command::ScreenCv {
                ticket,
                file,
                jd_text,
            };
            if !self.send(command) {
                self.cv.submission.abandon(ticket);
            }
        }
    }

    fn submit_quiz(&mut self) {
        if let Some((ticket, request)) = self.quiz.submit_generation() {
            if !self.send(Command::GenerateQuiz { ticket, request }) {
                self.quiz.generation.abandon(ticket);
            }
        }
    }

    fn submit_evaluation(&mut self) {
        if let Some((ticket, request)) = self.quiz.submit_evaluation() {
            if !self.send(Command::EvaluateQuiz { ticket, request }) {
                self.quiz.evaluation.abandon(ticket);
            }
        }
    }

    fn start_recording(&mut self) {
        if self.interview.request_start() && !self.send(Command::StartRecording) {
            self.interview.on_start_failed();
        }
    }

    fn stop_recording(&mut self) {
        if let Some(ticket) = self.interview.request_stop() {
            if !self.send(Command::StopRecording { ticket }) {
                self.interview.on_stop_ignored(ticket);
            }
        }
    }

    fn select_cv_path(&mut self, path: &std::path::Path) {
        if let Err(e) = self.cv.select_path(path) {
            log::warn!("app: could not read {}: {e}", path.display());
            self.cv.submission.fail_validation(format!("Could not read {}", path.display()));
        }
    }

    /// Pick up files dropped on the window while the CV page is open.
    fn take_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        self.page = Page::CvScreener;
        if let Some(path) = file.path {
            self.cv_path_input = path.display().to_string();
            self.select_cv_path(&path);
        } else if let Some(bytes) = file.bytes {
            self.cv
                .select_file(crate::api::CvFile::new(file.name, bytes.to_vec()));
        }
    }

    // ── Chrome ───────────────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for page in Page::ALL {
                ui.selectable_value(&mut self.page, page, page.label());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Recheck").clicked() {
                    self.backend = BackendStatus::Checking;
                    self.send(Command::CheckHealth);
                }
                ui.label(
                    egui::RichText::new(self.backend.label())
                        .color(band_color(self.backend.band()))
                        .size(11.0),
                );
            });
        });
    }

    // ── JD generator ─────────────────────────────────────────────────────

    fn draw_jd(&mut self, ui: &mut egui::Ui) {
        ui.heading("Job Description Generator");
        ui.add_space(8.0);

        ui.label("Role/Position");
        ui.add(egui::TextEdit::singleline(&mut self.jd.role).hint_text("e.g., Senior Software Engineer"));

        ui.add_space(6.0);
        ui.label("Required Skills");
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.jd.skill_input)
                    .hint_text("Add a skill and press Enter"),
            );
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || entered {
                self.jd.commit_skill_input();
                input.request_focus();
            }
        });

        let mut removed = None;
        ui.horizontal_wrapped(|ui| {
            for skill in self.jd.skills() {
                if ui.button(format!("{skill}  ×")).clicked() {
                    removed = Some(skill.clone());
                }
            }
        });
        if let Some(skill) = removed {
            self.jd.remove_skill(&skill);
        }

        ui.add_space(6.0);
        egui::ComboBox::from_label("Experience Level")
            .selected_text(self.jd.experience_level.label())
            .show_ui(ui, |ui| {
                for level in ExperienceLevel::ALL {
                    ui.selectable_value(&mut self.jd.experience_level, level, level.label());
                }
            });

        ui.add_space(6.0);
        ui.label("Company Type (Optional)");
        ui.add(
            egui::TextEdit::singleline(&mut self.jd.company_type)
                .hint_text("e.g., Startup, Enterprise, etc."),
        );

        ui.add_space(10.0);
        let label = if self.jd.submission.is_submitting() {
            "Generating..."
        } else {
            "Generate Job Description"
        };
        if ui
            .add_enabled(self.jd.can_submit(), egui::Button::new(label))
            .clicked()
        {
            self.submit_jd();
        }

        draw_error(ui, self.jd.submission.error());

        if let Some(jd) = self.jd.submission.result() {
            ui.separator();
            ui.heading(jd.title.as_str());
            ui.add_space(4.0);
            ui.label(jd.job_description.as_str());
            if ui.button("Copy to Clipboard").clicked() {
                ui.ctx().copy_text(jd.job_description.clone());
            }
        }
    }

    // ── CV screener ──────────────────────────────────────────────────────

    fn draw_cv(&mut self, ui: &mut egui::Ui) {
        ui.heading("CV Screener");
        ui.add_space(8.0);

        ui.label("Upload CV (PDF or DOCX): drop a file on the window or enter its path");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.cv_path_input);
            if ui.button("Select").clicked() {
                let path = std::path::PathBuf::from(self.cv_path_input.trim());
                self.select_cv_path(&path);
            }
        });
        if let Some(file) = self.cv.file() {
            ui.label(
                egui::RichText::new(format!("Selected: {} ({} bytes)", file.name, file.bytes.len()))
                    .color(egui::Color32::from_rgb(140, 140, 140)),
            );
        }

        ui.add_space(6.0);
        ui.label("Job Description");
        ui.add(
            egui::TextEdit::multiline(&mut self.cv.jd_text)
                .hint_text("Paste the job description here...")
                .desired_rows(8),
        );

        ui.add_space(10.0);
        let label = if self.cv.submission.is_submitting() {
            "Screening..."
        } else {
            "Screen CV"
        };
        if ui
            .add_enabled(self.cv.can_submit(), egui::Button::new(label))
            .clicked()
        {
            self.submit_cv();
        }

        draw_error(ui, self.cv.submission.error());

        if let Some(screen) = self.cv.submission.result() {
            ui.separator();
            draw_score(ui, "Match Score", screen.match_score, render::cv_match_band(screen.match_score));

            if let Some(level) = &screen.confidence_level {
                ui.label(
                    egui::RichText::new(format!("Confidence: {}", level.label()))
                        .color(band_color(render::confidence_band(level))),
                );
            }
            if let Some(analysis) = &screen.confidence_analysis {
                ui.label(analysis.as_str());
            }

            draw_list(ui, "Strengths", &screen.strengths, Band::Good);
            draw_list(ui, "Gaps", &screen.gaps, Band::Poor);

            ui.add_space(4.0);
            ui.strong("Recommendation");
            ui.label(screen.recommendation.as_str());
        }
    }

    // ── Tech quiz ────────────────────────────────────────────────────────

    fn draw_quiz(&mut self, ui: &mut egui::Ui) {
        ui.heading("Technical Assessment Generator");
        ui.add_space(8.0);

        ui.label("Role/Position");
        ui.add(egui::TextEdit::singleline(&mut self.quiz.role).hint_text("e.g., Backend Developer"));

        ui.add_space(6.0);
        egui::ComboBox::from_label("Skill Level")
            .selected_text(self.quiz.skill_level.label())
            .show_ui(ui, |ui| {
                for level in SkillLevel::ALL {
                    ui.selectable_value(&mut self.quiz.skill_level, level, level.label());
                }
            });

        let mut count = i64::from(self.quiz.num_questions());
        if ui
            .add(egui::Slider::new(&mut count, 3..=10).text("Number of Questions"))
            .changed()
        {
            self.quiz.set_num_questions(count);
        }

        ui.add_space(10.0);
        let label = if self.quiz.generation.is_submitting() {
            "Generating..."
        } else {
            "Generate Quiz"
        };
        if ui
            .add_enabled(self.quiz.can_generate(), egui::Button::new(label))
            .clicked()
        {
            self.submit_quiz();
        }

        draw_error(ui, self.quiz.generation.error());

        let questions = self.quiz.questions().to_vec();
        if questions.is_empty() {
            return;
        }

        ui.separator();
        for (i, question) in questions.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.strong(format!("Question {}", i + 1));
                ui.label(
                    egui::RichText::new(question.difficulty.label())
                        .color(band_color(render::difficulty_band(&question.difficulty))),
                );
                ui.label(
                    egui::RichText::new(question.topic.as_str())
                        .color(egui::Color32::from_rgb(140, 140, 140)),
                );
            });
            ui.label(question.question.as_str());
            if let Some(answer) = self.quiz.answer_mut(i) {
                ui.add(
                    egui::TextEdit::multiline(answer)
                        .hint_text("Type your answer here...")
                        .desired_rows(3),
                );
            }
            if let Some(reference) = &question.answer {
                ui.collapsing(format!("Reference answer {}", i + 1), |ui| {
                    ui.label(reference.as_str());
                });
            }
            ui.add_space(6.0);
        }

        let label = if self.quiz.evaluation.is_submitting() {
            "Evaluating..."
        } else {
            "Submit Answers"
        };
        if ui
            .add_enabled(self.quiz.can_evaluate(), egui::Button::new(label))
            .clicked()
        {
            self.submit_evaluation();
        }

        draw_error(ui, self.quiz.evaluation.error());

        if let Some(evaluation) = self.quiz.evaluation.result() {
            ui.separator();
            draw_score(ui, "Score", evaluation.score, render::quiz_score_band(evaluation.score));
            ui.label(
                egui::RichText::new(format!("Confidence: {}", evaluation.confidence_level.label()))
                    .color(band_color(render::confidence_band(&evaluation.confidence_level))),
            );
            ui.add_space(4.0);
            ui.strong("Feedback");
            ui.label(evaluation.feedback.as_str());
        }
    }

    // ── Live interview ───────────────────────────────────────────────────

    fn draw_interview(&mut self, ui: &mut egui::Ui) {
        ui.heading("Live Interview Assistant");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let color = match self.interview.phase() {
                crate::audio::RecordingPhase::Recording => egui::Color32::from_rgb(255, 68, 68),
                crate::audio::RecordingPhase::Finalizing => egui::Color32::from_rgb(68, 136, 255),
                crate::audio::RecordingPhase::Idle => egui::Color32::from_rgb(120, 120, 120),
            };
            ui.label(egui::RichText::new(self.interview.status_label()).color(color).size(15.0));
            if self.interview.is_analyzing() {
                ui.spinner();
            }
            if self.interview.can_stop() {
                ui.label(
                    egui::RichText::new(format!("{:.1}s", self.interview.elapsed_secs()))
                        .color(egui::Color32::from_rgb(255, 140, 140)),
                );
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.interview.can_start(), egui::Button::new("Start Recording"))
                .clicked()
            {
                self.start_recording();
            }
            if ui
                .add_enabled(self.interview.can_stop(), egui::Button::new("Stop Recording"))
                .clicked()
            {
                self.stop_recording();
            }
        });

        draw_error(ui, self.interview.analysis.error());

        if let Some(analysis) = self.interview.analysis.result() {
            ui.separator();
            draw_score(
                ui,
                "Confidence Score",
                analysis.confidence_score,
                render::audio_confidence_band(analysis.confidence_score),
            );
            ui.label(
                egui::RichText::new(format!("Confidence Level: {}", analysis.confidence_level.label()))
                    .color(band_color(render::confidence_band(&analysis.confidence_level))),
            );
            ui.label(format!("Tone: {}", analysis.tone));
            ui.add_space(4.0);
            ui.strong("Summary");
            ui.label(analysis.summary.as_str());
            ui.add_space(4.0);
            ui.strong("Transcription");
            ui.label(analysis.transcription.as_str());
        }
    }

    /// Anything waiting on the dispatcher.
    fn is_busy(&self) -> bool {
        self.jd.submission.is_submitting()
            || self.cv.submission.is_submitting()
            || self.quiz.generation.is_submitting()
            || self.quiz.evaluation.is_submitting()
            || self.interview.is_analyzing()
            || self.interview.is_start_pending()
            || self.interview.phase() != crate::audio::RecordingPhase::Idle
            || self.backend == BackendStatus::Checking
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn band_color(band: Band) -> egui::Color32 {
    let (r, g, b) = band.rgb();
    egui::Color32::from_rgb(r, g, b)
}

fn draw_error(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(message) = error {
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(message)
                .color(egui::Color32::from_rgb(255, 136, 68))
                .size(12.0),
        );
    }
}

fn draw_score(ui: &mut egui::Ui, title: &str, score: u32, band: Band) {
    ui.horizontal(|ui| {
        ui.strong(title);
        ui.label(
            egui::RichText::new(format!("{score}%"))
                .color(band_color(band))
                .size(22.0),
        );
    });
}

fn draw_list(ui: &mut egui::Ui, title: &str, items: &[String], band: Band) {
    if items.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.label(egui::RichText::new(title).strong().color(band_color(band)));
    for item in items {
        ui.label(format!("• {item}"));
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for RecruitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_outcomes();
        self.take_dropped_files(ctx);

        // Keep polling the outcome channel while work is outstanding.
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("pages").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_header(ui);
            ui.add_space(2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                Page::JdGenerator => self.draw_jd(ui),
                Page::CvScreener => self.draw_cv(ui),
                Page::TechQuiz => self.draw_quiz(ui),
                Page::LiveInterview => self.draw_interview(ui),
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = AppConfig::save_start_page(self.page) {
            log::warn!("app: could not remember start page: {e:#}");
        }
        log::info!(
            "recruit assistant closing (backend {})",
            self.config.api.base_url
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
