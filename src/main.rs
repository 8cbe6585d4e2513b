//! Application entry point: recruitment assistant.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run) and apply
//!    the `RECRUIT_API_URL` override.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the HTTP client and the microphone capture device from config.
//! 5. Create the dispatcher channels (`command`, `outcome`).
//! 6. Spawn the dispatcher on the tokio runtime.
//! 7. Run [`eframe::run_native`]; blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use recruit_assist::{
    api::{HttpApiClient, RecruitApi},
    app::RecruitApp,
    audio::{CaptureDevice, CpalCapture},
    config::{AppConfig, API_URL_ENV},
    dispatch::{Command, Dispatcher, Outcome},
};
use tokio::sync::mpsc;

use eframe::egui;

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Recruitment Assistant")
        .with_inner_size([width, height])
        .with_min_inner_size([600.0, 400.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Recruitment assistant starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.api = config
        .api
        .with_base_url_override(std::env::var(API_URL_ENV).ok());
    log::info!("Backend: {}", config.api.base_url);

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Backend client + microphone
    let api: Arc<dyn RecruitApi> = Arc::new(HttpApiClient::from_config(&config.api));
    match CpalCapture::input_device_names() {
        Ok(names) => log::debug!("Input devices: {names:?}"),
        Err(e) => log::warn!("Could not list input devices: {e}"),
    }
    let device: Arc<dyn CaptureDevice> = Arc::new(CpalCapture::from_config(&config.audio));

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    let (outcome_tx, outcome_rx) = mpsc::channel::<Outcome>(32);

    // 6. Dispatcher
    rt.spawn(Dispatcher::new(api, device, outcome_tx).run(command_rx));

    // 7. Window (blocks until closed)
    let app = RecruitApp::new(command_tx, outcome_rx, config.clone());
    eframe::run_native(
        "Recruitment Assistant",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
