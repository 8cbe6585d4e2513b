//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing keys fall back to their defaults, so a partial `settings.toml` is
//! accepted.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides [`ApiConfig::base_url`] at startup.
///
/// Read once in `main` and injected into the config; the API client itself
/// never looks at the environment.
pub const API_URL_ENV: &str = "RECRUIT_API_URL";

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The four tool pages of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    JdGenerator,
    CvScreener,
    TechQuiz,
    LiveInterview,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::JdGenerator,
        Page::CvScreener,
        Page::TechQuiz,
        Page::LiveInterview,
    ];

    /// Tab label shown in the page selector.
    pub fn label(&self) -> &'static str {
        match self {
            Page::JdGenerator => "JD Generator",
            Page::CvScreener => "CV Screener",
            Page::TechQuiz => "Tech Quiz",
            Page::LiveInterview => "Live Interview",
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::JdGenerator
    }
}

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the recruitment backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.  `None` leaves the transport default
    /// in place (no client-side timeout).
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Replace the base URL when `url` is present and non-blank.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Microphone capture settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Input device name; `None` means the system default.
    pub input_device: Option<String>,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Page shown when the window opens.
    pub start_page: Page,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (900.0, 700.0),
            start_page: Page::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use recruit_assist::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("backend: {}", config.api.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Microphone settings.
    pub audio: AudioConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Record `page` as the start page in the platform `settings.toml`.
    pub fn save_start_page(page: Page) -> Result<()> {
        Self::save_start_page_to(&AppPaths::new().settings_file, page)
    }

    /// Rewrite only `ui.start_page` in the file at `path`.  Runtime
    /// overrides such as `RECRUIT_API_URL` never reach the file.
    pub fn save_start_page_to(path: &std::path::Path, page: Page) -> Result<()> {
        let mut on_disk = Self::load_from(path)?;
        if path.exists() && on_disk.ui.start_page == page {
            return Ok(());
        }
        on_disk.ui.start_page = page;
        on_disk.save_to(path)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
